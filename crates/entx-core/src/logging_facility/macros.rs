//! Canonical logging macros

/// Log the start of an operation
///
/// ```
/// # use entx_core::log_op_start;
/// log_op_start!("classify_history");
/// log_op_start!("update_entity", entity_uuid = "1b2c");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::entx_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::entx_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use entx_core::log_op_end;
/// log_op_end!("classify_history", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::entx_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::entx_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation failure
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError);
/// the rendered error, tagged with `$op`, is logged as `error`.
///
/// ```
/// # use entx_core::{log_op_error, errors::EntityError};
/// let err = EntityError::EntityNotFound { uuid: "u1".to_string() };
/// log_op_error!("read_entity", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err = ::core::convert::Into::<$crate::errors::ExError>::into($err).with_op($op);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::entx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            error = %ex_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err = ::core::convert::Into::<$crate::errors::ExError>::into($err).with_op($op);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::entx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            error = %ex_err,
            $($field)*
        );
    }};
}
