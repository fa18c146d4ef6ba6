//! # Warranty Rules
//!
//! Decides whether the document carries the engine warranty disclosure,
//! based only on item codes.
//!
//! ## Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  entered = non-blank item codes, trimmed + uppercased                   │
//! │  eligible = entered ∩ configured warranty codes                         │
//! │                                                                         │
//! │  eligible empty                → no warranty text                       │
//! │  every entered code eligible   → generic text, no item list             │
//! │  some eligible, some not       → text naming the eligible items         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::ledger::LineItem;

/// Warranty-eligible item codes used when nothing is configured.
pub const DEFAULT_WARRANTY_CODES: [&str; 3] = ["500", "1005", "BOXER-150"];

const GENERIC_TEXT_EN: &str =
    "Warranty covers manufacturing defects of the engine only for 6 months from the invoice date.";
const GENERIC_TEXT_AR: &str = "يغطي الضمان عيوب التصنيع على المكينة فقط ولمدة 6 اشهر من تاريخ الفاتورة";

// =============================================================================
// Warranty Result
// =============================================================================

/// Warranty disclosure for the current ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WarrantyResult {
    pub applies: bool,
    pub text_arabic: String,
    pub text_english: String,
}

impl WarrantyResult {
    fn none() -> Self {
        Self::default()
    }

    fn generic() -> Self {
        WarrantyResult {
            applies: true,
            text_arabic: GENERIC_TEXT_AR.to_string(),
            text_english: GENERIC_TEXT_EN.to_string(),
        }
    }

    fn for_items(codes: &[&str]) -> Self {
        let plural = codes.len() > 1;
        let (item_en, item_ar) = if plural {
            ("items", "للأصناف")
        } else {
            ("item", "للصنف")
        };

        WarrantyResult {
            applies: true,
            text_arabic: format!("{} وذلك {} رقم: {}", GENERIC_TEXT_AR, item_ar, codes.join("، ")),
            text_english: format!(
                "{} This warranty applies to {} #: {}.",
                GENERIC_TEXT_EN,
                item_en,
                codes.join(", ")
            ),
        }
    }
}

// =============================================================================
// Warranty Rules
// =============================================================================

/// The configured set of warranty-eligible item codes.
///
/// Codes are compared case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarrantyRules {
    codes: HashSet<String>,
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

impl WarrantyRules {
    /// Builds rules from any list of codes. Blank codes are ignored.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        WarrantyRules {
            codes: codes
                .into_iter()
                .map(|code| normalize(code.as_ref()))
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    /// Whether `code` is warranty-eligible.
    pub fn is_eligible(&self, code: &str) -> bool {
        self.codes.contains(&normalize(code))
    }

    /// Number of configured codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no codes are configured.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Evaluates the warranty disclosure for `items`.
    ///
    /// Only item codes matter. Mixed documents list each eligible code once,
    /// spelled as it was first entered (trimmed), in order of appearance.
    ///
    /// ## Example
    /// ```rust
    /// use fatura_core::ledger::LineItem;
    /// use fatura_core::warranty::WarrantyRules;
    ///
    /// let rows: Vec<LineItem> = ["500", "1005", "XYZ"]
    ///     .iter()
    ///     .map(|code| LineItem { item_code: code.to_string(), ..LineItem::new() })
    ///     .collect();
    ///
    /// let result = WarrantyRules::default().evaluate(&rows);
    /// assert!(result.applies);
    /// assert!(result.text_english.contains("items #: 500, 1005"));
    /// ```
    pub fn evaluate(&self, items: &[LineItem]) -> WarrantyResult {
        let entered: Vec<&str> = items
            .iter()
            .map(|item| item.item_code.trim())
            .filter(|code| !code.is_empty())
            .collect();

        let mut seen = HashSet::new();
        let mut eligible: Vec<&str> = Vec::new();
        let mut any_ineligible = false;

        for code in entered {
            let normalized = normalize(code);
            if self.codes.contains(&normalized) {
                if seen.insert(normalized) {
                    eligible.push(code);
                }
            } else {
                any_ineligible = true;
            }
        }

        if eligible.is_empty() {
            WarrantyResult::none()
        } else if !any_ineligible {
            WarrantyResult::generic()
        } else {
            WarrantyResult::for_items(&eligible)
        }
    }
}

impl Default for WarrantyRules {
    fn default() -> Self {
        WarrantyRules::new(DEFAULT_WARRANTY_CODES)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
