//! Value-to-type conformance checks

use avm_primitives::U512;

use crate::error::{AbiError, Result, ValuePath};
use crate::types::Type;
use crate::value::Value;

/// Check that `value` conforms to `ty`
///
/// Errors name the nested element that failed through their [`ValuePath`].
pub fn validate(ty: &Type, value: &Value) -> Result<()> {
    validate_at(ty, value, &ValuePath::root())
}

fn validate_at(ty: &Type, value: &Value, path: &ValuePath) -> Result<()> {
    match (ty, value) {
        (Type::Uint(bits), Value::Uint(v)) | (Type::Ufixed(bits, _), Value::Ufixed(v)) => {
            check_width(v, bits.bits() as usize, path)
        }
        (Type::Byte, Value::Uint(v)) => check_width(v, 8, path),
        // Bool and Address carry their width in the Rust type
        (Type::Bool, Value::Bool(_))
        | (Type::Address, Value::Address(_))
        | (Type::String, Value::String(_)) => Ok(()),
        (Type::StaticArray(elem, len), Value::StaticArray(items)) => {
            if items.len() != *len as usize {
                return Err(AbiError::ArrayLengthMismatch {
                    path: path.clone(),
                    expected: *len as usize,
                    found: items.len(),
                });
            }
            validate_items(elem, items, path)
        }
        (Type::DynamicArray(elem), Value::DynamicArray(items)) => {
            validate_items(elem, items, path)
        }
        (Type::Tuple(fields), Value::Tuple(items)) => {
            if items.len() != fields.len() {
                return Err(AbiError::TupleArityMismatch {
                    path: path.clone(),
                    expected: fields.len(),
                    found: items.len(),
                });
            }
            for (i, (field, item)) in fields.iter().zip(items).enumerate() {
                validate_at(field, item, &path.child(i))?;
            }
            Ok(())
        }
        (ty, value) => Err(AbiError::TypeMismatch {
            path: path.clone(),
            expected: ty.to_string(),
            found: value.kind_name(),
        }),
    }
}

fn check_width(v: &U512, bits: usize, path: &ValuePath) -> Result<()> {
    if v.bits() > bits {
        return Err(AbiError::ValueOutOfRange {
            path: path.clone(),
            bits,
        });
    }
    Ok(())
}

fn validate_items(elem: &Type, items: &[Value], path: &ValuePath) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        validate_at(elem, item, &path.child(i))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use avm_primitives::{Address, U512};

    fn uint(bits: u16) -> Type {
        Type::uint(bits).unwrap()
    }

    #[test]
    fn test_uint_range() {
        assert!(validate(&uint(8), &Value::uint(255u64)).is_ok());
        let err = validate(&uint(8), &Value::uint(256u64)).unwrap_err();
        assert_eq!(
            err,
            AbiError::ValueOutOfRange {
                path: ValuePath::root(),
                bits: 8
            }
        );

        assert!(validate(&uint(512), &Value::Uint(U512::MAX)).is_ok());
        let max_256 = (U512::one() << 256) - U512::one();
        assert!(validate(&uint(256), &Value::Uint(max_256)).is_ok());
        assert!(validate(&uint(256), &Value::Uint(max_256 + U512::one())).is_err());
    }

    #[test]
    fn test_ufixed_range_ignores_precision() {
        let t = Type::ufixed(16, 160).unwrap();
        assert!(validate(&t, &Value::ufixed(65535u64)).is_ok());
        assert_eq!(
            validate(&t, &Value::ufixed(65536u64)).unwrap_err().kind(),
            ErrorKind::ValueOutOfRange
        );
    }

    #[test]
    fn test_uint_and_ufixed_do_not_mix() {
        let err = validate(&uint(64), &Value::ufixed(1u64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = validate(&Type::Byte, &Value::ufixed(1u64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_scalars() {
        assert!(validate(&Type::Bool, &Value::Bool(false)).is_ok());
        assert!(validate(&Type::Address, &Value::Address(Address::ZERO)).is_ok());
        assert!(validate(&Type::String, &Value::String(vec![0xff, 0x00])).is_ok());
    }

    #[test]
    fn test_byte_range() {
        assert!(validate(&Type::Byte, &Value::uint(0u64)).is_ok());
        assert!(validate(&Type::Byte, &Value::uint(255u64)).is_ok());
        assert!(validate(&Type::Byte, &Value::byte(0xff)).is_ok());
        assert_eq!(
            validate(&Type::Byte, &Value::uint(256u64)).unwrap_err(),
            AbiError::ValueOutOfRange {
                path: ValuePath::root(),
                bits: 8
            }
        );
    }

    #[test]
    fn test_static_array_length() {
        let t = Type::static_array(Type::Bool, 2);
        assert!(validate(&t, &Value::StaticArray(vec![true.into(), false.into()])).is_ok());
        let err = validate(&t, &Value::StaticArray(vec![true.into()])).unwrap_err();
        assert_eq!(
            err,
            AbiError::ArrayLengthMismatch {
                path: ValuePath::root(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_array_kinds_do_not_mix() {
        let t = Type::dynamic_array(Type::Bool);
        let err = validate(&t, &Value::StaticArray(vec![])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_tuple_arity() {
        let t = Type::tuple(vec![Type::Bool, Type::Byte]).unwrap();
        let err = validate(&t, &Value::Tuple(vec![true.into()])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TupleArityMismatch);
        assert!(validate(&Type::Tuple(vec![]), &Value::Tuple(vec![])).is_ok());
    }

    #[test]
    fn test_error_path_points_at_nested_element() {
        let t: Type = "(bool,(string,uint8[]))".parse().unwrap();
        let v = Value::Tuple(vec![
            true.into(),
            Value::Tuple(vec![
                "ok".into(),
                Value::DynamicArray(vec![Value::uint(1u64), Value::uint(300u64)]),
            ]),
        ]);
        let err = validate(&t, &v).unwrap_err();
        assert_eq!(err.to_string(), "value[1][1][1]: value does not fit in 8 bits");
    }
}
