/// Defines a `static` [`EventDescription`](crate::EventDescription).
///
/// ```
/// side::define_event! {
///     pub static REQUEST: "myprovider", "request", Info, [
///         side::field!("status", U16),
///         side::field_vla!("payload", U8),
///     ]
/// }
///
/// side::define_event! {
///     static variadic TAGS: "myprovider", "tags", Debug, [side::field!("id", U64)]
/// }
///
/// assert!(!REQUEST.is_variadic());
/// assert!(TAGS.is_variadic());
/// ```
#[macro_export]
macro_rules! define_event {
    (
        $(#[$attr:meta])*
        $vis:vis static variadic $name:ident : $provider:expr, $event:expr, $level:ident,
        [$($field:expr),* $(,)?] $(,)?
    ) => {
        $(#[$attr])*
        $vis static $name: $crate::EventDescription = $crate::EventDescription::new_variadic(
            $provider,
            $event,
            $crate::LogLevel::$level,
            &[$($field),*],
        );
    };
    (
        $(#[$attr:meta])*
        $vis:vis static $name:ident : $provider:expr, $event:expr, $level:ident,
        [$($field:expr),* $(,)?] $(,)?
    ) => {
        $(#[$attr])*
        $vis static $name: $crate::EventDescription = $crate::EventDescription::new(
            $provider,
            $event,
            $crate::LogLevel::$level,
            &[$($field),*],
        );
    };
}

/// A field of a scalar, string or dynamic type: `field!("len", U32)`.
#[macro_export]
macro_rules! field {
    ($name:expr, $ty:ident) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::$ty,
        }
    };
}

/// A struct field: `field_struct!("point", [field!("x", S32), field!("y", S32)])`.
#[macro_export]
macro_rules! field_struct {
    ($name:expr, [$($field:expr),* $(,)?]) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::Struct(&[$($field),*]),
        }
    };
}

/// A fixed-length array field. The element is a type name or any
/// [`Type`](crate::Type) constant expression.
#[macro_export]
macro_rules! field_array {
    ($name:expr, $elem:ident, $length:expr) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::Array {
                elem: &$crate::Type::$elem,
                length: $length,
            },
        }
    };
    ($name:expr, $elem:expr, $length:expr) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::Array {
                elem: &$elem,
                length: $length,
            },
        }
    };
}

/// A variable-length array field materialized at the call.
#[macro_export]
macro_rules! field_vla {
    ($name:expr, $elem:ident) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::Vla {
                elem: &$crate::Type::$elem,
            },
        }
    };
    ($name:expr, $elem:expr) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::Vla { elem: &$elem },
        }
    };
}

/// A variable-length array field produced by a [`Visitor`](crate::Visitor) at
/// the call.
#[macro_export]
macro_rules! field_vla_visitor {
    ($name:expr, $elem:ident) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::VlaVisitor {
                elem: &$crate::Type::$elem,
            },
        }
    };
    ($name:expr, $elem:expr) => {
        $crate::Field {
            name: $name,
            ty: $crate::Type::VlaVisitor { elem: &$elem },
        }
    };
}

/// Fires a non-variadic event if it is enabled.
///
/// Arguments are only evaluated when the event is enabled. Each one goes
/// through `Arg::from`, so scalars and strings can be passed as is.
#[macro_export]
macro_rules! event {
    ($event:expr, [$($arg:expr),* $(,)?] $(,)?) => {
        if $event.is_enabled() {
            $crate::call(&$event, &$crate::ArgVec::new(&[$($crate::Arg::from($arg)),*]));
        }
    };
}

/// Fires a variadic event if it is enabled.
///
/// The trailing `(name, value)` pairs go through `Dynamic::from`.
#[macro_export]
macro_rules! event_variadic {
    (
        $event:expr,
        [$($arg:expr),* $(,)?],
        [$(($key:expr, $value:expr)),* $(,)?] $(,)?
    ) => {
        if $event.is_enabled() {
            $crate::call_variadic(
                &$event,
                &$crate::ArgVec::new(&[$($crate::Arg::from($arg)),*]),
                &$crate::DynamicStruct::new(&[
                    $($crate::DynamicField::new($key, $crate::Dynamic::from($value))),*
                ]),
            );
        }
    };
}
