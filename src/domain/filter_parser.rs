//! Filter expression parser.
//!
//! Recursive descent over the grammar:
//!
//! ```text
//! filter    := indicator operator operand
//! operator  := "<" | ">" | "<=" | ">=" | LT | GT | LE | GE
//! operand   := number | indicator
//! indicator := OPEN | HIGH | LOW | CLOSE | VOLUME | TR
//!            | (SMA|EMA|LWMA|WILDER|RSI|ROC|RSL) "(" int ["," field] ")"
//!            | (ATR|ATRP|ADX) "(" int ")"
//!            | (BB_UPPER|BB_MIDDLE|BB_LOWER|BB_WIDTH) "(" int "," number ["," makind] ")"
//! ```
//!
//! Keywords are case-insensitive. Every indicator's `Display` output parses
//! back to an equivalent indicator.

use crate::domain::error::{ParseError, WatchlistError};
use crate::domain::filter::{Comparison, ComparisonOperand, Filter};
use crate::domain::indicator::{
    validate_period, AverageDirectionalIndex, AverageTrueRange, AverageTrueRangePercent, BandField,
    Bollinger, Indicator, MaKind, MovingAverage, Price, RateOfChange, RelativeStrengthIndex,
    RelativeStrengthLevy, TrueRange,
};
use crate::domain::ohlcv::PriceField;

const INDICATOR_KEYWORDS: &[&str] = &[
    "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME", "TR", "SMA", "EMA", "LWMA", "WILDER", "RSI", "ROC",
    "RSL", "ATR", "ATRP", "ADX", "BB_UPPER", "BB_MIDDLE", "BB_LOWER", "BB_WIDTH",
];

/// Parse a complete filter such as `RSI(14) < 30` or `CLOSE > SMA(200)`.
pub fn parse_filter(input: &str) -> Result<Filter, WatchlistError> {
    let mut parser = Parser::new(input);
    let indicator = parser.parse_indicator()?;
    let operator = parser.parse_operator()?;
    let value = parser.parse_operand()?;
    parser.expect_end()?;
    Ok(Filter {
        indicator,
        operator,
        value,
    })
}

/// Parse a single indicator expression such as `ROC(10,VOLUME)`.
pub fn parse_indicator(input: &str) -> Result<Box<dyn Indicator>, WatchlistError> {
    let mut parser = Parser::new(input);
    let indicator = parser.parse_indicator()?;
    parser.expect_end()?;
    Ok(indicator)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError {
            message: message.into(),
            position,
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{}', found '{}'", expected, ch), self.pos)),
            None => Err(self.error(
                format!("expected '{}', found end of input", expected),
                self.pos,
            )),
        }
    }

    fn consume_char(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_word(&self) -> &'a str {
        let remaining = self.remaining();
        let end = remaining
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(remaining.len());
        &remaining[..end]
    }

    fn take_word(&mut self) -> &'a str {
        let word = self.peek_word();
        self.pos += word.len();
        word
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.remaining().is_empty() {
            Ok(())
        } else {
            Err(self.error(
                format!("unexpected trailing input '{}'", self.remaining()),
                self.pos,
            ))
        }
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        if matches!(self.peek(), Some('-') | Some('+')) {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(self.error("expected number", start));
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map_err(|_| self.error(format!("invalid number: {}", num_str), start))
    }

    /// A signed integer checked with `validate_period`.
    fn parse_period(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }

        let num_str = &self.input[start..self.pos];
        let period = num_str
            .parse::<i64>()
            .map_err(|_| self.error("expected integer period", start))?;
        validate_period(period).map_err(|e| self.error(e.to_string(), start))
    }

    fn parse_price_field(&mut self) -> Result<PriceField, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let word = self.take_word();
        word.parse::<PriceField>().map_err(|_| {
            self.error(
                format!(
                    "expected price field (OPEN, HIGH, LOW, CLOSE, VOLUME), found '{}'",
                    word
                ),
                start,
            )
        })
    }

    fn parse_ma_kind(&mut self) -> Result<MaKind, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let word = self.take_word();
        word.parse::<MaKind>().map_err(|msg| self.error(msg, start))
    }

    /// `"(" int ["," field] ")"`
    fn parse_series_args(&mut self) -> Result<(usize, PriceField), ParseError> {
        self.expect_char('(')?;
        let period = self.parse_period()?;
        let field = if self.consume_char(',') {
            self.parse_price_field()?
        } else {
            PriceField::Close
        };
        self.expect_char(')')?;
        Ok((period, field))
    }

    /// `"(" int ")"`
    fn parse_period_arg(&mut self) -> Result<usize, ParseError> {
        self.expect_char('(')?;
        let period = self.parse_period()?;
        self.expect_char(')')?;
        Ok(period)
    }

    fn parse_indicator(&mut self) -> Result<Box<dyn Indicator>, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let word = self.take_word().to_ascii_uppercase();

        let indicator: Box<dyn Indicator> = match word.as_str() {
            "OPEN" | "HIGH" | "LOW" | "CLOSE" | "VOLUME" => {
                let field = word
                    .parse::<PriceField>()
                    .map_err(|msg| self.error(msg, start))?;
                Box::new(Price::new(field))
            }
            "TR" => Box::new(TrueRange::default()),
            "SMA" | "EMA" | "LWMA" | "WILDER" => {
                let kind = word.parse::<MaKind>().map_err(|msg| self.error(msg, start))?;
                let (period, field) = self.parse_series_args()?;
                Box::new(MovingAverage::from_source(field, period, kind))
            }
            "RSI" => {
                let (period, field) = self.parse_series_args()?;
                Box::new(RelativeStrengthIndex::from_source(field, period))
            }
            "ROC" => {
                let (period, field) = self.parse_series_args()?;
                Box::new(RateOfChange::from_source(field, period))
            }
            "RSL" => {
                let (period, field) = self.parse_series_args()?;
                Box::new(RelativeStrengthLevy::from_source(field, period))
            }
            "ATR" => Box::new(AverageTrueRange::unbound(self.parse_period_arg()?)),
            "ATRP" => Box::new(AverageTrueRangePercent::unbound(self.parse_period_arg()?)),
            "ADX" => Box::new(AverageDirectionalIndex::unbound(self.parse_period_arg()?)),
            _ => match BandField::from_keyword(&word) {
                Some(band) => self.parse_bollinger(band)?,
                None if word.is_empty() => {
                    return Err(self.error(
                        format!("expected indicator, found '{}'", self.remaining()),
                        start,
                    ));
                }
                None => {
                    return Err(self.error(format!("unknown indicator '{}'", word), start));
                }
            },
        };
        Ok(indicator)
    }

    /// `"(" int "," number ["," makind] ")"` after a `BB_*` keyword.
    fn parse_bollinger(&mut self, band: BandField) -> Result<Box<dyn Indicator>, ParseError> {
        self.expect_char('(')?;
        let period = self.parse_period()?;
        self.expect_char(',')?;
        let factor_at = self.pos;
        let factor = self.parse_number()?;
        if factor < 0.0 {
            return Err(self.error(format!("invalid factor: {}", factor), factor_at));
        }
        let kind = if self.consume_char(',') {
            self.parse_ma_kind()?
        } else {
            MaKind::Sma
        };
        self.expect_char(')')?;
        Ok(Box::new(Bollinger::from_source(
            PriceField::Close,
            period,
            factor,
            kind,
            band,
        )))
    }

    fn parse_operator(&mut self) -> Result<Comparison, WatchlistError> {
        self.skip_whitespace();
        let start = self.pos;
        let symbolic = self
            .remaining()
            .find(|c: char| !matches!(c, '<' | '>' | '=' | '!'))
            .unwrap_or(self.remaining().len());

        let token = if symbolic > 0 {
            let token = &self.remaining()[..symbolic];
            self.pos += symbolic;
            token
        } else {
            self.take_word()
        };

        if token.is_empty() {
            return Err(self.error("expected comparison operator", start).into());
        }
        token.parse::<Comparison>()
    }

    fn parse_operand(&mut self) -> Result<ComparisonOperand, WatchlistError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("expected comparison value", self.pos).into()),
            Some(ch) if ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.') => {
                Ok(ComparisonOperand::Literal(self.parse_number()?))
            }
            Some(_) => {
                let word = self.peek_word().to_ascii_uppercase();
                if INDICATOR_KEYWORDS.contains(&word.as_str()) {
                    Ok(ComparisonOperand::Indicator(self.parse_indicator()?))
                } else {
                    Err(WatchlistError::UnsupportedComparisonValue(
                        self.remaining().trim().to_string(),
                    ))
                }
            }
        }
    }
}
