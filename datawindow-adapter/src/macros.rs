#[cfg(feature = "tracing")]
macro_rules! adtrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "datawindow_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! adtrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! addebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "datawindow_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! addebug {
    ($($tt:tt)*) => {};
}
