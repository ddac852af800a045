//! Domain error types.

/// Invalid-parameter failures raised by the indicator library.
///
/// "Not enough history yet" is not an error: indicators that need a minimum
/// number of bars return an empty output instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("input is empty")]
    EmptyInput,

    #[error("invalid period: 0")]
    ZeroPeriod,

    #[error("invalid period: {0}")]
    NegativePeriod(i64),

    #[error("invalid period: {period} > {len}")]
    PeriodTooLarge { period: usize, len: usize },

    #[error("invalid factor: {0}")]
    NegativeFactor(f64),

    #[error("bar history columns differ in length: {reason}")]
    MismatchedLengths { reason: String },
}

/// A parse error with position information for filter expressions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Filter and ranking failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WatchlistError {
    #[error("comparison value is neither a number nor an indicator: '{0}'")]
    UnsupportedComparisonValue(String),

    #[error("unknown comparison operator: '{0}'")]
    UnknownOperator(String),

    #[error("unknown rank order: '{0}'")]
    UnknownRankOrder(String),

    #[error("{indicator} produced no values")]
    InsufficientData { indicator: String },

    #[error("{symbol}: filter '{filter}' failed: {source}")]
    FilterFailed {
        symbol: String,
        filter: String,
        source: Box<WatchlistError>,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

/// Top-level error type for tradekit.
#[derive(Debug, thiserror::Error)]
pub enum TradekitError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Watchlist(#[from] WatchlistError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradekitError> for std::process::ExitCode {
    fn from(err: &TradekitError) -> Self {
        let code: u8 = match err {
            TradekitError::Io(_) => 1,
            TradekitError::ConfigParse { .. }
            | TradekitError::ConfigMissing { .. }
            | TradekitError::ConfigInvalid { .. } => 2,
            TradekitError::Data { .. } => 3,
            TradekitError::Indicator(_) | TradekitError::Watchlist(_) => 4,
            TradekitError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
