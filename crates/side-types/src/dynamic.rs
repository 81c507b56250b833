/// A value whose type is only known at the call.
///
/// Used for fields declared [`crate::Type::Dynamic`] and for the trailing
/// arguments of variadic events. Sequences and maps nest without limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dynamic<'a> {
    Null,
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
    /// Ordered sequence, elements need not share a type.
    Vla(&'a [Dynamic<'a>]),
    /// Ordered key/value pairs. Keys are unique within one map.
    Map(&'a [DynamicField<'a>]),
}

impl Dynamic<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::U8(_) => "u8",
            Dynamic::U16(_) => "u16",
            Dynamic::U32(_) => "u32",
            Dynamic::U64(_) => "u64",
            Dynamic::S8(_) => "s8",
            Dynamic::S16(_) => "s16",
            Dynamic::S32(_) => "s32",
            Dynamic::S64(_) => "s64",
            Dynamic::F32(_) => "float32",
            Dynamic::F64(_) => "float64",
            Dynamic::String(_) => "string",
            Dynamic::Vla(_) => "vla",
            Dynamic::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }
}

macro_rules! impl_dynamic_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Dynamic<'_> {
                fn from(value: $ty) -> Self {
                    Dynamic::$variant(value)
                }
            }
        )*
    };
}

impl_dynamic_from! {
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

impl<'a> From<&'a str> for Dynamic<'a> {
    fn from(value: &'a str) -> Self {
        Dynamic::String(value)
    }
}

impl<'a, T> From<Option<T>> for Dynamic<'a>
where
    T: Into<Dynamic<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Dynamic::Null, Into::into)
    }
}

/// A (name, value) pair of a dynamic map or variadic argument list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicField<'a> {
    pub name: &'a str,
    pub value: Dynamic<'a>,
}

impl<'a> DynamicField<'a> {
    pub const fn new(name: &'a str, value: Dynamic<'a>) -> Self {
        Self { name, value }
    }
}

/// Trailing arguments of a variadic call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicStruct<'a> {
    fields: &'a [DynamicField<'a>],
}

impl<'a> DynamicStruct<'a> {
    pub const fn new(fields: &'a [DynamicField<'a>]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'a [DynamicField<'a>] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'a Dynamic<'a>> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}
