use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tallybook_core::{DomainError, DomainResult};

/// Well-known account names used by the built-in chart and the period-end
/// engines. Callers are free to post to other names; those go through the
/// keyword fallback in [`ChartOfAccounts::classify`].
pub mod names {
    pub const CASH: &str = "Cash";
    pub const BANK: &str = "Bank";
    pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
    pub const INVENTORY: &str = "Inventory";
    pub const SUPPLIES: &str = "Supplies";
    pub const PREPAID_RENT: &str = "Prepaid Rent";

    pub const EQUIPMENT: &str = "Equipment";
    pub const BUILDING: &str = "Building";
    pub const LAND: &str = "Land";
    pub const VEHICLES: &str = "Vehicles";
    pub const MACHINERY: &str = "Machinery";
    pub const FURNITURE: &str = "Furniture";

    pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable";
    pub const BANK_LOAN: &str = "Bank Loan";
    pub const UNEARNED_REVENUE: &str = "Unearned Revenue";

    pub const OWNERS_CAPITAL: &str = "Owner's Capital";
    pub const DRAWINGS: &str = "Drawings";
    pub const INCOME_SUMMARY: &str = "Income Summary";

    pub const SALES: &str = "Sales";
    pub const SALES_REVENUE: &str = "Sales Revenue";
    pub const SERVICE_REVENUE: &str = "Service Revenue";
    pub const OTHER_REVENUE: &str = "Other Revenue";

    pub const PURCHASES: &str = "Purchases";
    pub const SALARIES_EXPENSE: &str = "Salaries Expense";
    pub const RENT_EXPENSE: &str = "Rent Expense";
    pub const UTILITIES_EXPENSE: &str = "Utilities Expense";
    pub const TRANSPORT_EXPENSE: &str = "Transport Expense";
    pub const SUPPLIES_EXPENSE: &str = "Supplies Expense";
    pub const MISCELLANEOUS_EXPENSE: &str = "Miscellaneous Expense";

    /// Generated depreciation entries use `"{prefix} - {asset}"`.
    pub const DEPRECIATION_EXPENSE_PREFIX: &str = "Depreciation Expense";
    pub const ACCUMULATED_DEPRECIATION_PREFIX: &str = "Accumulated Depreciation";
}

/// High-level account category (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
    /// Name matched neither the chart nor the keyword heuristic. Surfaced
    /// explicitly so callers can confirm a category via
    /// [`ChartOfAccounts::register`] instead of getting a silent best guess.
    Unclassified,
}

impl Category {
    /// Side on which balances of this category are conventionally positive.
    pub fn normal_side(self) -> Side {
        match self {
            Category::Asset | Category::Expense => Side::Debit,
            Category::Liability | Category::Equity | Category::Revenue => Side::Credit,
            // Unclassified accounts participate in arithmetic as
            // debit-normal until the caller confirms a category.
            Category::Unclassified => Side::Debit,
        }
    }
}

/// The two sides of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

/// Current vs fixed split for asset accounts, used by the balance sheet and
/// the cash-flow investing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Current,
    Fixed,
}

/// Result of classifying an account name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub normal_side: Side,
}

/// Chart entry. `contra` flips the normal side derived from the category
/// (Drawings is debit-normal equity, Accumulated Depreciation is
/// credit-normal against assets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccountDef {
    category: Category,
    contra: bool,
    asset_class: Option<AssetClass>,
}

impl AccountDef {
    const fn plain(category: Category) -> Self {
        Self {
            category,
            contra: false,
            asset_class: None,
        }
    }

    const fn asset(class: AssetClass) -> Self {
        Self {
            category: Category::Asset,
            contra: false,
            asset_class: Some(class),
        }
    }

    const fn contra(category: Category) -> Self {
        Self {
            category,
            contra: true,
            asset_class: None,
        }
    }

    fn classification(&self) -> Classification {
        let derived = self.category.normal_side();
        Classification {
            category: self.category,
            normal_side: if self.contra { derived.opposite() } else { derived },
        }
    }
}

/// Chart-of-accounts record as persisted by the surrounding application.
///
/// The `balance` field, when present in storage, is a legacy cache and is
/// never trusted; balances are always recomputed from the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
}

fn builtin(name: &str) -> Option<AccountDef> {
    use names::*;
    use AssetClass::{Current, Fixed};
    use Category::*;

    let def = match name {
        CASH | BANK | ACCOUNTS_RECEIVABLE | INVENTORY | SUPPLIES | PREPAID_RENT => {
            AccountDef::asset(Current)
        }
        EQUIPMENT | BUILDING | LAND | VEHICLES | MACHINERY | FURNITURE => {
            AccountDef::asset(Fixed)
        }
        ACCOUNTS_PAYABLE | BANK_LOAN | UNEARNED_REVENUE => AccountDef::plain(Liability),
        OWNERS_CAPITAL | INCOME_SUMMARY => AccountDef::plain(Equity),
        DRAWINGS => AccountDef::contra(Equity),
        SALES | SALES_REVENUE | SERVICE_REVENUE | OTHER_REVENUE => AccountDef::plain(Revenue),
        PURCHASES | SALARIES_EXPENSE | RENT_EXPENSE | UTILITIES_EXPENSE | TRANSPORT_EXPENSE
        | SUPPLIES_EXPENSE | MISCELLANEOUS_EXPENSE => AccountDef::plain(Expense),
        _ => return None,
    };

    Some(def)
}

/// Single authoritative account classification.
///
/// Every other component asks the chart which category and normal side an
/// account has; none of them re-derive the rule.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    /// Caller-registered accounts. Take precedence over the built-in table.
    registered: HashMap<String, AccountDef>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or confirm) an account's classification, overriding the
    /// built-in table and the keyword fallback.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        category: Category,
        contra: bool,
        asset_class: Option<AssetClass>,
    ) -> DomainResult<()> {
        if category == Category::Unclassified {
            return Err(DomainError::validation(
                "cannot register an account as unclassified",
            ));
        }
        if asset_class.is_some() && category != Category::Asset {
            return Err(DomainError::validation(
                "asset class only applies to asset accounts",
            ));
        }
        self.registered.insert(
            name.into(),
            AccountDef {
                category,
                contra,
                asset_class,
            },
        );
        Ok(())
    }

    /// Import chart records from external storage. Cached `balance` fields
    /// are dropped on the floor.
    pub fn load_records(&mut self, records: HashMap<String, ChartRecord>) -> DomainResult<()> {
        for (name, record) in records {
            if record.balance.is_some() {
                tracing::debug!(account = %name, "ignoring cached balance in chart record");
            }
            self.register(name, record.category, false, None)?;
        }
        Ok(())
    }

    /// Classify an account name: registered accounts first, then the
    /// built-in table, then prefix/keyword fallback, else `Unclassified`.
    pub fn classify(&self, name: &str) -> Classification {
        if let Some(def) = self.registered.get(name) {
            return def.classification();
        }
        if let Some(def) = builtin(name) {
            return def.classification();
        }
        if name.starts_with(names::ACCUMULATED_DEPRECIATION_PREFIX) {
            return AccountDef::contra(Category::Asset).classification();
        }
        if name.starts_with(names::DEPRECIATION_EXPENSE_PREFIX) || name.contains("Expense") {
            return AccountDef::plain(Category::Expense).classification();
        }
        if name.contains("Revenue") || name.contains("Sales") || name.contains("Income") {
            return AccountDef::plain(Category::Revenue).classification();
        }
        AccountDef::plain(Category::Unclassified).classification()
    }

    pub fn category(&self, name: &str) -> Category {
        self.classify(name).category
    }

    pub fn normal_side(&self, name: &str) -> Side {
        self.classify(name).normal_side
    }

    /// Nominal accounts are closed to zero each period: revenue, expense,
    /// drawings and the income-summary clearing account.
    pub fn is_nominal(&self, name: &str) -> bool {
        if name == names::DRAWINGS || name == names::INCOME_SUMMARY {
            return true;
        }
        matches!(self.category(name), Category::Revenue | Category::Expense)
    }

    /// Real accounts carry forward across periods.
    pub fn is_real(&self, name: &str) -> bool {
        !self.is_nominal(name)
    }

    /// Current/fixed split for asset accounts. Contra assets (accumulated
    /// depreciation) report `None`; asset accounts without an explicit class
    /// default to current.
    pub fn asset_class(&self, name: &str) -> Option<AssetClass> {
        let classification = self.classify(name);
        if classification.category != Category::Asset
            || classification.normal_side == Side::Credit
        {
            return None;
        }
        let def = self
            .registered
            .get(name)
            .copied()
            .or_else(|| builtin(name));
        def.and_then(|d| d.asset_class).or(Some(AssetClass::Current))
    }

    /// Contra-asset accounts (credit-normal assets, i.e. accumulated
    /// depreciation) net against gross fixed assets on the balance sheet.
    pub fn is_contra_asset(&self, name: &str) -> bool {
        let c = self.classify(name);
        c.category == Category::Asset && c.normal_side == Side::Credit
    }

    pub fn is_depreciation_expense(&self, name: &str) -> bool {
        name.starts_with(names::DEPRECIATION_EXPENSE_PREFIX)
    }

    /// Purchases feed cost of goods sold, not operating expenses.
    pub fn is_purchases(&self, name: &str) -> bool {
        name == names::PURCHASES
    }
}
