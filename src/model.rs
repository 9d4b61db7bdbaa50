/// Declare a model with one getter and one `set_` method per field.
///
/// Each accessor is bound to the server's field name at definition time and
/// goes through [`Record::get`](crate::Record::get) /
/// [`Record::set`](crate::Record::set), so the usual existence check and
/// dirty tracking apply. [`check`](#method.check) verifies the declared names
/// against a registry up front.
///
/// ```ignore
/// fm_model! {
///     pub struct Candidate {
///         name => "name",
///         candidate_id => "ca id",
///         salary => "salary",
///     }
/// }
///
/// let mut candidate = Candidate::from_record(record);
/// candidate.set_salary(150)?;
/// ```
#[macro_export]
macro_rules! fm_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $model:ident {
            $( $field:ident => $fm_name:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $model {
            record: $crate::Record,
        }

        impl $model {
            /// Server field names, in declaration order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$($fm_name),*];

            /// Fail with `UnknownField` for the first declared name the
            /// registry does not know.
            pub fn check(registry: &$crate::FieldRegistry) -> Result<(), $crate::RecordError> {
                for name in Self::FIELD_NAMES {
                    registry.lookup(name)?;
                }
                Ok(())
            }

            pub fn from_record(record: $crate::Record) -> Self {
                Self { record }
            }

            /// Check the set's registry, then wrap every record.
            pub fn from_result_set(
                result_set: $crate::ResultSet,
            ) -> Result<Vec<Self>, $crate::RecordError> {
                Self::check(result_set.fields())?;
                Ok(result_set.into_iter().map(Self::from_record).collect())
            }

            pub fn record(&self) -> &$crate::Record {
                &self.record
            }

            pub fn into_record(self) -> $crate::Record {
                self.record
            }

            pub fn dirty(&self) -> &$crate::IndifferentMap<$crate::FmValue> {
                self.record.dirty()
            }

            pub fn is_changed(&self) -> bool {
                self.record.is_changed()
            }

            pub fn changed(&self) -> Vec<&$crate::FieldName> {
                self.record.changed()
            }

            $(
                pub fn $field(&self) -> Result<&$crate::FmValue, $crate::RecordError> {
                    self.record.get($fm_name)
                }

                $crate::paste::paste! {
                    pub fn [<set_ $field>](
                        &mut self,
                        value: impl Into<$crate::FmValue>,
                    ) -> Result<(), $crate::RecordError> {
                        self.record.set($fm_name, value)
                    }
                }
            )*
        }

        impl From<$crate::Record> for $model {
            fn from(record: $crate::Record) -> Self {
                Self::from_record(record)
            }
        }
    };
}
