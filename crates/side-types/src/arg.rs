use crate::dynamic::Dynamic;
use crate::types::IntType;
use crate::visitor::Visitor;

/// One node of an argument vector.
///
/// Built on the stack right before a call. Variable-length data is borrowed
/// from the caller, never copied.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    F32(f32),
    F64(f64),
    String(&'a str),
    Struct(&'a [Arg<'a>]),
    Array(&'a [Arg<'a>]),
    Vla(&'a [Arg<'a>]),
    VlaVisitor(&'a dyn Visitor),
    /// Integer array passed as a typed slice instead of one node per element.
    ArrayInt(IntSlice<'a>),
    VlaInt(IntSlice<'a>),
    Dynamic(Dynamic<'a>),
}

impl<'a> Arg<'a> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::U8(_) => "u8",
            Arg::U16(_) => "u16",
            Arg::U32(_) => "u32",
            Arg::U64(_) => "u64",
            Arg::S8(_) => "s8",
            Arg::S16(_) => "s16",
            Arg::S32(_) => "s32",
            Arg::S64(_) => "s64",
            Arg::F32(_) => "float32",
            Arg::F64(_) => "float64",
            Arg::String(_) => "string",
            Arg::Struct(_) => "struct",
            Arg::Array(_) => "array",
            Arg::Vla(_) => "vla",
            Arg::VlaVisitor(_) => "vla_visitor",
            Arg::ArrayInt(_) => "array_int",
            Arg::VlaInt(_) => "vla_int",
            Arg::Dynamic(_) => "dynamic",
        }
    }

    pub fn array_int(values: impl Into<IntSlice<'a>>) -> Self {
        Arg::ArrayInt(values.into())
    }

    pub fn vla_int(values: impl Into<IntSlice<'a>>) -> Self {
        Arg::VlaInt(values.into())
    }
}

impl std::fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Arg::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Arg::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Arg::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Arg::S8(v) => f.debug_tuple("S8").field(v).finish(),
            Arg::S16(v) => f.debug_tuple("S16").field(v).finish(),
            Arg::S32(v) => f.debug_tuple("S32").field(v).finish(),
            Arg::S64(v) => f.debug_tuple("S64").field(v).finish(),
            Arg::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Arg::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Arg::String(v) => f.debug_tuple("String").field(v).finish(),
            Arg::Struct(v) => f.debug_tuple("Struct").field(v).finish(),
            Arg::Array(v) => f.debug_tuple("Array").field(v).finish(),
            Arg::Vla(v) => f.debug_tuple("Vla").field(v).finish(),
            // The visitor is opaque until a tracer runs it.
            Arg::VlaVisitor(_) => f.write_str("VlaVisitor(..)"),
            Arg::ArrayInt(v) => f.debug_tuple("ArrayInt").field(v).finish(),
            Arg::VlaInt(v) => f.debug_tuple("VlaInt").field(v).finish(),
            Arg::Dynamic(v) => f.debug_tuple("Dynamic").field(v).finish(),
        }
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    Arg::$variant(value)
                }
            }
        )*
    };
}

impl_arg_from! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => S8,
    i16 => S16,
    i32 => S32,
    i64 => S64,
    f32 => F32,
    f64 => F64,
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::String(value)
    }
}

impl<'a> From<Dynamic<'a>> for Arg<'a> {
    fn from(value: Dynamic<'a>) -> Self {
        Arg::Dynamic(value)
    }
}

/// Borrowed slice of fixed-width integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntSlice<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),
    U64(&'a [u64]),
    S8(&'a [i8]),
    S16(&'a [i16]),
    S32(&'a [i32]),
    S64(&'a [i64]),
}

impl<'a> IntSlice<'a> {
    pub fn int_type(&self) -> IntType {
        match self {
            IntSlice::U8(_) => IntType::U8,
            IntSlice::U16(_) => IntType::U16,
            IntSlice::U32(_) => IntType::U32,
            IntSlice::U64(_) => IntType::U64,
            IntSlice::S8(_) => IntType::S8,
            IntSlice::S16(_) => IntType::S16,
            IntSlice::S32(_) => IntType::S32,
            IntSlice::S64(_) => IntType::S64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IntSlice::U8(s) => s.len(),
            IntSlice::U16(s) => s.len(),
            IntSlice::U32(s) => s.len(),
            IntSlice::U64(s) => s.len(),
            IntSlice::S8(s) => s.len(),
            IntSlice::S16(s) => s.len(),
            IntSlice::S32(s) => s.len(),
            IntSlice::S64(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Arg<'a>> {
        match self {
            IntSlice::U8(s) => s.get(index).copied().map(Arg::U8),
            IntSlice::U16(s) => s.get(index).copied().map(Arg::U16),
            IntSlice::U32(s) => s.get(index).copied().map(Arg::U32),
            IntSlice::U64(s) => s.get(index).copied().map(Arg::U64),
            IntSlice::S8(s) => s.get(index).copied().map(Arg::S8),
            IntSlice::S16(s) => s.get(index).copied().map(Arg::S16),
            IntSlice::S32(s) => s.get(index).copied().map(Arg::S32),
            IntSlice::S64(s) => s.get(index).copied().map(Arg::S64),
        }
    }

    /// Iterates the elements as scalar argument nodes.
    pub fn iter(&self) -> impl Iterator<Item = Arg<'a>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

macro_rules! impl_int_slice_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a [$ty]> for IntSlice<'a> {
                fn from(values: &'a [$ty]) -> Self {
                    IntSlice::$variant(values)
                }
            }

            impl<'a, const N: usize> From<&'a [$ty; N]> for IntSlice<'a> {
                fn from(values: &'a [$ty; N]) -> Self {
                    IntSlice::$variant(values)
                }
            }
        )*
    };
}

impl_int_slice_from! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => S8,
    i16 => S16,
    i32 => S32,
    i64 => S64,
}

/// The argument list of one call, in field declaration order.
#[derive(Debug, Clone, Copy)]
pub struct ArgVec<'a> {
    args: &'a [Arg<'a>],
}

impl<'a> ArgVec<'a> {
    pub const fn new(args: &'a [Arg<'a>]) -> Self {
        Self { args }
    }

    pub const fn empty() -> Self {
        Self { args: &[] }
    }

    pub fn args(&self) -> &'a [Arg<'a>] {
        self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Arg<'a>> {
        self.args.iter()
    }
}

impl<'a> IntoIterator for &ArgVec<'a> {
    type Item = &'a Arg<'a>;
    type IntoIter = std::slice::Iter<'a, Arg<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_slice_iter() {
        let values = [-444i64, 555, 123, 2897432587];
        let slice = IntSlice::from(&values);

        assert_eq!(slice.len(), 4);
        assert_eq!(slice.int_type(), IntType::S64);
        let collected: Vec<i64> = slice
            .iter()
            .map(|arg| match arg {
                Arg::S64(v) => v,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(collected, values);
        assert!(slice.get(4).is_none());
    }

    #[test]
    fn test_arg_from_scalars() {
        assert!(matches!(Arg::from(42u32), Arg::U32(42)));
        assert!(matches!(Arg::from(-500i64), Arg::S64(-500)));
        assert!(matches!(Arg::from("zzz"), Arg::String("zzz")));
        assert_eq!(Arg::vla_int(&[1u8, 2][..]).kind_name(), "vla_int");
    }

    #[test]
    fn test_arg_vec_order() {
        let nested = [Arg::U32(21), Arg::S64(22)];
        let args = [Arg::Struct(&nested), Arg::U8(55)];
        let vec = ArgVec::new(&args);

        assert_eq!(vec.len(), 2);
        let kinds: Vec<_> = vec.iter().map(Arg::kind_name).collect();
        assert_eq!(kinds, vec!["struct", "u8"]);
        assert!(ArgVec::empty().is_empty());
    }
}
