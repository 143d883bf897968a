//! Call-site macros.

/// Capture the enclosing function as a [`Frame`](crate::caller::Frame).
#[macro_export]
macro_rules! here {
    () => {{
        fn __here() {}
        $crate::caller::Frame::from_type_path(::std::any::type_name_of_val(&__here))
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shorthand {
    ($entry:ident, $logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.$entry(
            &$crate::caller::CallStack::entry(
                $crate::caller::Frame::method("Logger", ::std::stringify!($entry)),
                $crate::here!(),
            ),
            &[$($crate::message::Loggable::to_log_arg(&$arg)),*],
        )
    };
}

/// Log the arguments at INFO, labelled with the calling function.
///
/// ```no_run
/// # let logger = daylog::Logger::new();
/// let _ = daylog::i!(logger, "loaded", vec![1, 2, 3]);
/// ```
#[macro_export]
macro_rules! i {
    ($($t:tt)*) => { $crate::__shorthand!(i, $($t)*) };
}

/// Log the arguments at DEBUG, labelled with the calling function.
#[macro_export]
macro_rules! d {
    ($($t:tt)*) => { $crate::__shorthand!(d, $($t)*) };
}

/// Log the arguments at WARNING, labelled with the calling function.
#[macro_export]
macro_rules! w {
    ($($t:tt)*) => { $crate::__shorthand!(w, $($t)*) };
}

/// Log the arguments at ERROR, labelled with the calling function.
#[macro_export]
macro_rules! e {
    ($($t:tt)*) => { $crate::__shorthand!(e, $($t)*) };
}
