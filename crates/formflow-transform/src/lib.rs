//! # formflow-transform
//!
//! Two-way data transformers for form handling. Each transformer converts a
//! model value (a number, date-time, interval, identifier, or domain value)
//! into the strings and maps an HTML widget works with, and converts
//! submitted input back, failing with a [`FormError`](formflow_core::FormError)
//! when the input is malformed.
//!
//! ## Modules
//!
//! - [`transformer`] - The [`DataTransformer`] trait, chains, and closures
//! - [`number`] - Localized numbers, integers, money, percentages, floats
//! - [`datetime`] - Date-times as strings, maps, timestamps, and weeks
//! - [`interval`] - Date intervals as maps and formatted strings
//! - [`structural`] - Delimited strings, parts, and duplicated values
//! - [`signed`] - HMAC-signed values
//! - [`boolean`] - Checkbox booleans
//! - [`identifier`] - UUIDs and ULIDs
//! - [`choice`] - Choice lists and selections
//! - [`factory`] - Transformers preconfigured from settings
//!
//! ## Example
//!
//! ```
//! use formflow_core::{Locale, Value};
//! use formflow_transform::prelude::*;
//!
//! let chain = DataTransformerChain::default()
//!     .with(StringToFloat::default())
//!     .with(NumberToLocalizedString::new(Locale::new("de")).with_scale(2));
//!
//! assert_eq!(chain.transform(&Value::from("1234.5")).unwrap(), Value::from("1234,50"));
//! assert_eq!(chain.reverse_transform(&Value::from("1234,5")).unwrap(), Value::from("1234.5"));
//! ```

pub mod boolean;
pub mod choice;
pub mod datetime;
pub mod factory;
pub mod identifier;
pub mod interval;
pub mod number;
pub mod signed;
pub mod structural;
pub mod transformer;

pub use transformer::{CallbackTransformer, DataTransformer, DataTransformerChain};

/// Every transformer, for glob import.
pub mod prelude {
    pub use crate::boolean::BooleanToString;
    pub use crate::choice::{ChoiceList, ChoiceToValue, ChoicesToValues};
    pub use crate::datetime::{
        DateField, DateTimeToArray, DateTimeToHtml5LocalDateTime, DateTimeToRfc3339,
        DateTimeToString, DateTimeToTimestamp, DateTimeZoneToString, WeekToArray,
    };
    pub use crate::factory::TransformerFactory;
    pub use crate::identifier::{UlidToString, UuidToString};
    pub use crate::interval::{DateIntervalToArray, DateIntervalToString, IntervalField};
    pub use crate::number::{
        IntegerToLocalizedString, MoneyToLocalizedString, NumberToLocalizedString,
        PercentToLocalizedString, PercentType, StringToFloat,
    };
    pub use crate::signed::ValueToSigned;
    pub use crate::structural::{ArrayToDelimitedString, ArrayToParts, ValueToDuplicates};
    pub use crate::transformer::{CallbackTransformer, DataTransformer, DataTransformerChain};
}
