//! Binding of builder values to `Any` driver arguments.

use sqlx::Arguments;
use sqlx::any::AnyArguments;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::FilterValue;

/// Converts builder values into positional arguments, in order. List values
/// expand to one argument per element, matching the `IN (...)` placeholders.
pub fn into_arguments<'q>(values: &[FilterValue]) -> AppResult<AnyArguments<'q>> {
    let mut args = AnyArguments::default();
    for value in values {
        let bound = match value {
            FilterValue::Integer(v) => args.add(*v),
            FilterValue::String(v) => args.add(v.clone()),
            FilterValue::Timestamp(v) => args.add(*v),
            FilterValue::IntegerList(list) => list.iter().try_for_each(|v| args.add(*v)),
        };
        bound.map_err(|e| AppError::query_build(format!("Failed to bind query argument: {e}")))?;
    }
    Ok(args)
}
