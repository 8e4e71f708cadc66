use std::fmt;

/// Errors raised while coercing or range-checking a scalar input.
///
/// These carry the field name so the adapter layer can surface the message
/// next to the offending form control without extra bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidateError {
    /// The raw text is not parseable as the target type.
    CannotConvert { name: String, target: &'static str },
    /// A float was supplied where a whole number is required.
    NotWholeNumber { name: String, value: f64 },
    /// Only literal `true`/`false` are accepted for boolean fields.
    NotBoolean { name: String },
    /// String fields must be non-empty after trimming.
    EmptyString { name: String },
    BelowMinimum { name: String, min: f64 },
    AboveMaximum { name: String, max: f64 },
    /// Value is not a member of the enumerated choice set.
    InvalidChoice {
        name: String,
        allowed: &'static [&'static str],
    },
    /// Time-of-day text did not parse, or hour/minute were out of range.
    InvalidTime { name: String },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::CannotConvert { name, target } => {
                write!(f, "{name} cannot be converted to {target}.")
            }
            ValidateError::NotWholeNumber { name, value } => {
                write!(f, "{name}: {value} is not a whole number.")
            }
            ValidateError::NotBoolean { name } => {
                write!(f, "{name} must be either true or false.")
            }
            ValidateError::EmptyString { name } => {
                write!(f, "{name} must be a non-empty string.")
            }
            ValidateError::BelowMinimum { name, min } => {
                write!(f, "{name} must be at least {min}.")
            }
            ValidateError::AboveMaximum { name, max } => {
                write!(f, "{name} must be at most {max}.")
            }
            ValidateError::InvalidChoice { name, allowed } => {
                write!(f, "Invalid value for {name}. Must be one of: {}", allowed.join(", "))
            }
            ValidateError::InvalidTime { name } => {
                write!(f, "{name} is not a valid time input.")
            }
        }
    }
}

impl std::error::Error for ValidateError {}

/// Errors raised by the sample-size and field-planning calculators.
///
/// Sizing is fail-fast: a degenerate input never silently produces an
/// unusable (zero, negative, or infinite) sample size.
#[derive(Debug, Clone, PartialEq)]
pub enum SizingError {
    /// The sample design string is not one the calculator supports.
    UnknownDesign(String),
    /// Clustered designs require a design effect.
    MissingDesignEffect,
    Validate(ValidateError),
    /// A zero margin of error would require an infinite sample.
    ZeroMarginOfError,
    /// With 100% expected non-response no sample size can compensate.
    FullNonResponse { non_response: f64 },
    /// The subpopulation share is zero, so no household count exists.
    ZeroSubpopulation,
    /// Mortality-rate sizing needs a recall period of at least one day.
    ZeroRecallPeriod,
    /// Rest and travel time consume the entire working day.
    NoFieldTime {
        total_minutes: i64,
        rest_minutes: i64,
        travel_minutes: i64,
    },
    /// The per-team daily budget floors to zero completed interviews per PSU.
    ZeroPsuCapacity,
}

impl fmt::Display for SizingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingError::UnknownDesign(design) => {
                write!(f, "unsupported sample design {design:?}")
            }
            SizingError::MissingDesignEffect => {
                write!(f, "clustered designs require a design effect")
            }
            SizingError::Validate(e) => write!(f, "{e}"),
            SizingError::ZeroMarginOfError => {
                write!(f, "margin of error must be greater than zero")
            }
            SizingError::FullNonResponse { non_response } => {
                write!(f, "non-response rate of {non_response}% leaves no expected responses")
            }
            SizingError::ZeroSubpopulation => {
                write!(f, "subpopulation proportion must be greater than zero")
            }
            SizingError::ZeroRecallPeriod => {
                write!(f, "recall period must be at least one day")
            }
            SizingError::NoFieldTime {
                total_minutes,
                rest_minutes,
                travel_minutes,
            } => {
                write!(
                    f,
                    "rest ({rest_minutes} min) and travel ({travel_minutes} min) consume the \
                     entire working day ({total_minutes} min)"
                )
            }
            SizingError::ZeroPsuCapacity => {
                write!(f, "daily time budget is too small to complete any interview per PSU")
            }
        }
    }
}

impl std::error::Error for SizingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SizingError::Validate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidateError> for SizingError {
    fn from(e: ValidateError) -> Self {
        SizingError::Validate(e)
    }
}

/// Errors raised while assembling a dataset or constructing an estimator.
///
/// These are configuration failures and raise immediately; statistical edge
/// cases inside an estimation call are reported through the `error` field of
/// `EstimateResult` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatorError {
    ColumnNotFound(String),
    EmptyDataset,
    /// Survey weights must be strictly positive.
    NonPositiveWeight { row: usize, value: f64 },
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorError::ColumnNotFound(name) => {
                write!(f, "column {name:?} not found in dataset")
            }
            EstimatorError::EmptyDataset => write!(f, "dataset has no rows"),
            EstimatorError::NonPositiveWeight { row, value } => {
                write!(f, "weight {value} at row {row} is not strictly positive")
            }
            EstimatorError::LengthMismatch {
                column,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "column {column:?} has {actual} rows, expected {expected}"
                )
            }
        }
    }
}

impl std::error::Error for EstimatorError {}
