use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Severity of an event, following the syslog ordering (lower is more severe).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Err = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    #[default]
    Debug = 7,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Emerg => "emerg",
            LogLevel::Alert => "alert",
            LogLevel::Crit => "crit",
            LogLevel::Err => "err",
            LogLevel::Warning => "warning",
            LogLevel::Notice => "notice",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, typed entry of an event's field list.
///
/// Fields are plain data so that nested literals in a `static` initializer are
/// promoted to `'static` without any allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: Type,
}

impl Field {
    pub const fn new(name: &'static str, ty: Type) -> Self {
        Self { name, ty }
    }
}

/// Description-time shape of a field.
///
/// Every kind except [`Type::Dynamic`] fixes the shape of the argument ahead of
/// the call. A dynamic field carries its concrete type in the argument itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Type {
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    String,
    Struct(&'static [Field]),
    Array { elem: &'static Type, length: usize },
    Vla { elem: &'static Type },
    /// Variable-length sequence produced lazily by a visitor supplied at the call.
    VlaVisitor { elem: &'static Type },
    Dynamic,
}

/// Width and signedness of the integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
}

impl IntType {
    pub fn as_type(&self) -> Type {
        match self {
            IntType::U8 => Type::U8,
            IntType::U16 => Type::U16,
            IntType::U32 => Type::U32,
            IntType::U64 => Type::U64,
            IntType::S8 => Type::S8,
            IntType::S16 => Type::S16,
            IntType::S32 => Type::S32,
            IntType::S64 => Type::S64,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            IntType::S8 | IntType::S16 | IntType::S32 | IntType::S64
        )
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            IntType::U8 | IntType::S8 => 1,
            IntType::U16 | IntType::S16 => 2,
            IntType::U32 | IntType::S32 => 4,
            IntType::U64 | IntType::S64 => 8,
        }
    }
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Type::U8 => "u8",
            Type::U16 => "u16",
            Type::U32 => "u32",
            Type::U64 => "u64",
            Type::S8 => "s8",
            Type::S16 => "s16",
            Type::S32 => "s32",
            Type::S64 => "s64",
            Type::F32 => "float32",
            Type::F64 => "float64",
            Type::String => "string",
            Type::Struct(_) => "struct",
            Type::Array { .. } => "array",
            Type::Vla { .. } => "vla",
            Type::VlaVisitor { .. } => "vla_visitor",
            Type::Dynamic => "dynamic",
        }
    }

    pub fn int_type(&self) -> Option<IntType> {
        match self {
            Type::U8 => Some(IntType::U8),
            Type::U16 => Some(IntType::U16),
            Type::U32 => Some(IntType::U32),
            Type::U64 => Some(IntType::U64),
            Type::S8 => Some(IntType::S8),
            Type::S16 => Some(IntType::S16),
            Type::S32 => Some(IntType::S32),
            Type::S64 => Some(IntType::S64),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.int_type().is_some()
    }

    pub fn is_scalar(&self) -> bool {
        self.is_integer() || matches!(self, Type::F32 | Type::F64 | Type::String)
    }

    /// Element type of the sequence kinds.
    pub fn element(&self) -> Option<&'static Type> {
        match self {
            Type::Array { elem, .. } | Type::Vla { elem } | Type::VlaVisitor { elem } => Some(*elem),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Struct(fields) => write!(
                f,
                "struct {{ {} }}",
                fields
                    .iter()
                    .map(|field| format!("{}: {}", field.name, field.ty))
                    .join(", ")
            ),
            Type::Array { elem, length } => write!(f, "array<{elem}, {length}>"),
            Type::Vla { elem } => write!(f, "vla<{elem}>"),
            Type::VlaVisitor { elem } => write!(f, "vla_visitor<{elem}>"),
            _ => write!(f, "{}", self.name()),
        }
    }
}
