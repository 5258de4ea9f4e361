// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display language, currency symbol and the fixed strings handed to the
//! timeline engine and the table/export layers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    He,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::He => "he",
            Language::En => "en",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "he" => Some(Language::He),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// Display-only currency. Amounts are never converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ils,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ils => "ILS",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Ils => "₪",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ILS" => Some(Currency::Ils),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            _ => None,
        }
    }
}

/// Persisted display preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,
    pub currency: Currency,
}

/// Strings the timeline engine writes into synthetic and undescribed entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub initial_balance: String,
    pub income: String,
    pub payment: String,
    pub checkpoint: String,
}

impl Labels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::He => Labels {
                initial_balance: "יתרה התחלתית".into(),
                income: "הכנסה".into(),
                payment: "תשלום".into(),
                checkpoint: "נקודת ביקורת".into(),
            },
            Language::En => Labels {
                initial_balance: "Initial balance".into(),
                income: "Income".into(),
                payment: "Payment".into(),
                checkpoint: "Checkpoint".into(),
            },
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels::for_language(Language::default())
    }
}

/// Column and row captions for tables and CSV sheets.
#[derive(Debug, Clone, Copy)]
pub struct Headings {
    pub date: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub amount: &'static str,
    pub balance: &'static str,
    pub kind: &'static str,
    pub amount_type: &'static str,
    pub percentage_base: &'static str,
    pub fixed: &'static str,
    pub percentage: &'static str,
    pub buy_price: &'static str,
    pub sell_price: &'static str,
    pub not_set: &'static str,
    pub prices: &'static str,
    pub initial_funds: &'static str,
    pub total_initial: &'static str,
    pub summary: &'static str,
    pub total_income: &'static str,
    pub total_payments: &'static str,
    pub final_balance: &'static str,
    pub title: &'static str,
}

impl Headings {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::He => Headings {
                date: "תאריך",
                description: "אירוע",
                category: "קטגוריה",
                amount: "סכום",
                balance: "יתרה",
                kind: "סוג",
                amount_type: "סוג סכום",
                percentage_base: "בסיס אחוז",
                fixed: "קבוע",
                percentage: "אחוז",
                buy_price: "מחיר קניה",
                sell_price: "מחיר מכירה",
                not_set: "לא הוגדר",
                prices: "מחירים",
                initial_funds: "יתרה התחלתית",
                total_initial: "סה\"כ יתרה התחלתית",
                summary: "סיכום",
                total_income: "סה\"כ הכנסות",
                total_payments: "סה\"כ תשלומים",
                final_balance: "יתרה סופית",
                title: "מתכנן קניית ומכירת דירה",
            },
            Language::En => Headings {
                date: "Date",
                description: "Event",
                category: "Category",
                amount: "Amount",
                balance: "Balance",
                kind: "Type",
                amount_type: "Amount type",
                percentage_base: "Percentage base",
                fixed: "Fixed",
                percentage: "Percentage",
                buy_price: "Buy price",
                sell_price: "Sell price",
                not_set: "Not set",
                prices: "Prices",
                initial_funds: "Initial funds",
                total_initial: "Total initial funds",
                summary: "Summary",
                total_income: "Total income",
                total_payments: "Total payments",
                final_balance: "Final balance",
                title: "Apartment buy & sell planner",
            },
        }
    }
}
