use crate::errors::ToolError;
use serde_json::Value;

/// Time bucket for cost rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBin {
    Day,
    Week,
    #[default]
    Month,
}

impl DateBin {
    pub fn as_str(self) -> &'static str {
        match self {
            DateBin::Day => "day",
            DateBin::Week => "week",
            DateBin::Month => "month",
        }
    }

    /// Reads `date_bin` from tool arguments. Missing or blank means month.
    pub fn from_args(args: &Value) -> Result<Self, ToolError> {
        let raw = match args.get("date_bin") {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::String(text)) => text.trim().to_lowercase(),
            Some(_) => return Err(invalid_bin()),
        };
        match raw.as_str() {
            "" => Ok(Self::default()),
            "day" => Ok(DateBin::Day),
            "week" => Ok(DateBin::Week),
            "month" => Ok(DateBin::Month),
            _ => Err(invalid_bin()),
        }
    }

    /// Explains what one row covers, e.g. `notes("Costs")`.
    pub fn notes(self, subject: &str) -> String {
        match self {
            DateBin::Day => format!("{} records represent one day.", subject),
            DateBin::Week => format!(
                "{} records represent one week, the accrued_at field is the first day of the week. \
                 If your date range is less than one week, this record includes only data for \
                 that date range, not the full week.",
                subject
            ),
            DateBin::Month => format!(
                "{} records represent one month, the accrued_at field is the first day of the \
                 month. If your date range is less than one month, this record includes only \
                 data for that date range, not the full month.",
                subject
            ),
        }
    }
}

fn invalid_bin() -> ToolError {
    ToolError::invalid_params("date_bin: expected one of day, week, month")
}
