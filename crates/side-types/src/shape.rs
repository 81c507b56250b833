//! Checks that an argument vector matches the field list it is fired against.

use crate::arg::{Arg, ArgVec, IntSlice};
use crate::dynamic::{Dynamic, DynamicField, DynamicStruct};
use crate::types::{Field, Type};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    FieldCount {
        expected: usize,
        found: usize,
    },
    TypeMismatch {
        field: &'static str,
        expected: String,
        found: &'static str,
    },
    ArrayLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    DuplicateKey {
        field: &'static str,
        key: String,
    },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::FieldCount { expected, found } => {
                write!(f, "expected {expected} arguments, found {found}")
            }
            ShapeError::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field `{field}`: expected {expected}, found {found}"),
            ShapeError::ArrayLength {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}`: expected {expected} array elements, found {found}"
            ),
            ShapeError::DuplicateKey { field, key } => {
                write!(f, "field `{field}`: duplicate dynamic key `{key}`")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Validates `args` against `fields`, field for field, in declaration order.
pub fn check_fields(fields: &[Field], args: &ArgVec<'_>) -> Result<(), ShapeError> {
    check_field_list(fields, args.args())
}

fn check_field_list(fields: &[Field], args: &[Arg<'_>]) -> Result<(), ShapeError> {
    if fields.len() != args.len() {
        return Err(ShapeError::FieldCount {
            expected: fields.len(),
            found: args.len(),
        });
    }
    for (field, arg) in fields.iter().zip(args) {
        check_typed(field.name, &field.ty, arg)?;
    }
    Ok(())
}

/// Validates a single argument against a type.
///
/// Visitor elements are not known ahead of the visit: tracers can call this on
/// each element they receive, with the declared element type.
pub fn check_arg(ty: &Type, arg: &Arg<'_>) -> Result<(), ShapeError> {
    check_typed("<element>", ty, arg)
}

fn check_typed(field: &'static str, ty: &Type, arg: &Arg<'_>) -> Result<(), ShapeError> {
    let mismatch = || ShapeError::TypeMismatch {
        field,
        expected: ty.to_string(),
        found: arg.kind_name(),
    };

    match (ty, arg) {
        (Type::U8, Arg::U8(_))
        | (Type::U16, Arg::U16(_))
        | (Type::U32, Arg::U32(_))
        | (Type::U64, Arg::U64(_))
        | (Type::S8, Arg::S8(_))
        | (Type::S16, Arg::S16(_))
        | (Type::S32, Arg::S32(_))
        | (Type::S64, Arg::S64(_))
        | (Type::F32, Arg::F32(_))
        | (Type::F64, Arg::F64(_))
        | (Type::String, Arg::String(_))
        | (Type::VlaVisitor { .. }, Arg::VlaVisitor(_)) => Ok(()),
        (Type::Struct(fields), Arg::Struct(args)) => check_field_list(fields, args),
        (Type::Array { elem, length }, Arg::Array(items)) => {
            check_length(field, *length, items.len())?;
            check_elements(field, elem, items)
        }
        (Type::Array { elem, length }, Arg::ArrayInt(slice)) => {
            check_length(field, *length, slice.len())?;
            check_int_slice(field, elem, slice)
        }
        (Type::Vla { elem }, Arg::Vla(items)) => check_elements(field, elem, items),
        (Type::Vla { elem }, Arg::VlaInt(slice)) => check_int_slice(field, elem, slice),
        (Type::Dynamic, Arg::Dynamic(value)) => check_dynamic_value(field, value),
        _ => Err(mismatch()),
    }
}

fn check_length(field: &'static str, expected: usize, found: usize) -> Result<(), ShapeError> {
    if expected != found {
        return Err(ShapeError::ArrayLength {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_elements(
    field: &'static str,
    elem: &Type,
    items: &[Arg<'_>],
) -> Result<(), ShapeError> {
    items
        .iter()
        .try_for_each(|item| check_typed(field, elem, item))
}

fn check_int_slice(
    field: &'static str,
    elem: &Type,
    slice: &IntSlice<'_>,
) -> Result<(), ShapeError> {
    if elem.int_type() != Some(slice.int_type()) {
        return Err(ShapeError::TypeMismatch {
            field,
            expected: elem.to_string(),
            found: slice.int_type().as_type().name(),
        });
    }
    Ok(())
}

/// Validates a dynamic value: map keys must be unique at every nesting level.
pub fn check_dynamic(value: &Dynamic<'_>) -> Result<(), ShapeError> {
    check_dynamic_value("<dynamic>", value)
}

/// Validates the trailing arguments of a variadic call.
pub fn check_dynamic_struct(var_struct: &DynamicStruct<'_>) -> Result<(), ShapeError> {
    check_dynamic_fields("<variadic>", var_struct.fields())
}

fn check_dynamic_value(field: &'static str, value: &Dynamic<'_>) -> Result<(), ShapeError> {
    match value {
        Dynamic::Vla(items) => items
            .iter()
            .try_for_each(|item| check_dynamic_value(field, item)),
        Dynamic::Map(entries) => check_dynamic_fields(field, entries),
        _ => Ok(()),
    }
}

fn check_dynamic_fields(
    field: &'static str,
    entries: &[DynamicField<'_>],
) -> Result<(), ShapeError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.name) {
            return Err(ShapeError::DuplicateKey {
                field,
                key: entry.name.to_string(),
            });
        }
        check_dynamic_value(field, &entry.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::{VisitorStatus, WriteElem};
    use rstest::rstest;

    static FIELDS: [Field; 3] = [
        Field {
            name: "point",
            ty: Type::Struct(&[
                Field {
                    name: "x",
                    ty: Type::U32,
                },
                Field {
                    name: "y",
                    ty: Type::S64,
                },
            ]),
        },
        Field {
            name: "arr",
            ty: Type::Array {
                elem: &Type::U32,
                length: 3,
            },
        },
        Field {
            name: "dynamic",
            ty: Type::Dynamic,
        },
    ];

    struct Empty;

    impl crate::visitor::Visitor for Empty {
        fn visit(&self, _writer: &mut dyn WriteElem) -> VisitorStatus {
            VisitorStatus::Ok
        }
    }

    #[test]
    fn test_matching_shape() {
        let point = [Arg::U32(1), Arg::S64(2)];
        let arr = [1u32, 2, 3];
        let args = [
            Arg::Struct(&point),
            Arg::array_int(&arr),
            Arg::Dynamic(Dynamic::Null),
        ];
        assert_eq!(check_fields(&FIELDS, &ArgVec::new(&args)), Ok(()));
    }

    #[rstest]
    #[case::too_few(vec![], ShapeError::FieldCount { expected: 3, found: 0 })]
    #[case::wrong_scalar(
        vec![Arg::U32(1), Arg::U32(2), Arg::Dynamic(Dynamic::Null)],
        ShapeError::TypeMismatch {
            field: "point",
            expected: "struct { x: u32, y: s64 }".to_string(),
            found: "u32",
        }
    )]
    fn test_shape_mismatch(#[case] args: Vec<Arg<'static>>, #[case] expected: ShapeError) {
        assert_eq!(check_fields(&FIELDS, &ArgVec::new(&args)), Err(expected));
    }

    #[test]
    fn test_array_length_mismatch() {
        let point = [Arg::U32(1), Arg::S64(2)];
        let items = [Arg::U32(1), Arg::U32(2)];
        let args = [
            Arg::Struct(&point),
            Arg::Array(&items),
            Arg::Dynamic(Dynamic::Null),
        ];
        assert_eq!(
            check_fields(&FIELDS, &ArgVec::new(&args)),
            Err(ShapeError::ArrayLength {
                field: "arr",
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_int_slice_width_mismatch() {
        let values = [1i64, 2, 3];
        let err = check_arg(
            &Type::Vla { elem: &Type::U32 },
            &Arg::vla_int(&values),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "field `<element>`: expected u32, found s64");
    }

    #[test]
    fn test_visitor_is_accepted_without_traversal() {
        let visitor = Empty;
        let ty = Type::VlaVisitor { elem: &Type::U32 };
        assert_eq!(check_arg(&ty, &Arg::VlaVisitor(&visitor)), Ok(()));
    }

    #[test]
    fn test_check_against_runtime_built_type() {
        let elem = Type::S16;
        let ty = Type::Array {
            elem: &Type::S16,
            length: 2,
        };
        let values = [1i16, 2, 3];

        assert_eq!(check_arg(&elem, &Arg::S16(4)), Ok(()));
        assert_eq!(
            check_arg(&ty, &Arg::array_int(&values)),
            Err(ShapeError::ArrayLength {
                field: "<element>",
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_duplicate_dynamic_key() {
        let inner = [
            DynamicField::new("a", Dynamic::U32(1)),
            DynamicField::new("a", Dynamic::Null),
        ];
        let seq = [Dynamic::Map(&inner)];
        let value = Dynamic::Vla(&seq);
        assert_eq!(
            check_dynamic(&value),
            Err(ShapeError::DuplicateKey {
                field: "<dynamic>",
                key: "a".to_string()
            })
        );

        let ok = [
            DynamicField::new("a", Dynamic::U32(1)),
            DynamicField::new("b", Dynamic::Map(&[])),
        ];
        assert_eq!(check_dynamic_struct(&DynamicStruct::new(&ok)), Ok(()));
    }
}
