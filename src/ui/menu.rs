use crate::error::DashboardError;
use crate::models::RatioKind;

/// What a metric menu entry does when chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Ratio(RatioKind),
    /// Listed in the menu but no ratio view exists for it yet
    Unimplemented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub label: &'static str,
    pub target: MenuTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGroup {
    pub label: &'static str,
    pub options: &'static [MenuOption],
}

const fn ratio(kind: RatioKind, label: &'static str) -> MenuOption {
    MenuOption { label, target: MenuTarget::Ratio(kind) }
}

const fn unimplemented(label: &'static str) -> MenuOption {
    MenuOption { label, target: MenuTarget::Unimplemented }
}

pub const METRIC_MENU: &[MenuGroup] = &[
    MenuGroup {
        label: "Profitability",
        options: &[
            ratio(RatioKind::NetProfitMargin, "Net Profit Margin"),
            ratio(RatioKind::OperatingMargin, "Operating Margin"),
        ],
    },
    MenuGroup {
        label: "Liquidity",
        options: &[
            ratio(RatioKind::CurrentRatio, "Current Ratio"),
            ratio(RatioKind::CashRatio, "Cash Ratio"),
        ],
    },
    MenuGroup {
        label: "Solvency",
        options: &[
            ratio(RatioKind::DebtEquityRatio, "Debt to Equity Ratio"),
            ratio(RatioKind::DebtAssetRatio, "Debt to Asset Ratio"),
        ],
    },
    MenuGroup {
        label: "Efficiency",
        options: &[
            ratio(RatioKind::InventoryTurnover, "Inventory Turnover"),
            ratio(RatioKind::AssetTurnover, "Asset Turnover"),
        ],
    },
    MenuGroup {
        label: "Valuation",
        options: &[unimplemented("P/E Ratio"), unimplemented("P/B Ratio")],
    },
];

/// A menu entry the user picked, ready for the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Ratio(RatioKind),
    Unimplemented(String),
}

impl From<&MenuOption> for MenuChoice {
    fn from(option: &MenuOption) -> Self {
        match option.target {
            MenuTarget::Ratio(kind) => MenuChoice::Ratio(kind),
            MenuTarget::Unimplemented => MenuChoice::Unimplemented(option.label.to_string()),
        }
    }
}

/// Look up a menu label. Labels that are not in the menu at all are treated
/// the same as listed-but-unimplemented entries.
pub fn choice_for_label(label: &str) -> MenuChoice {
    METRIC_MENU
        .iter()
        .flat_map(|group| group.options.iter())
        .find(|option| option.label == label)
        .map(MenuChoice::from)
        .unwrap_or_else(|| MenuChoice::Unimplemented(label.to_string()))
}

/// Resolve a ratio named on the command line.
///
/// Accepts anything `RatioKind` parses, then falls back to the menu labels so
/// listed-but-unimplemented entries get the same message as in the dashboard.
pub fn resolve_ratio(input: &str) -> Result<RatioKind, DashboardError> {
    let choice = input
        .parse::<RatioKind>()
        .map(MenuChoice::Ratio)
        .unwrap_or_else(|_| choice_for_label(input.trim()));
    match choice {
        MenuChoice::Ratio(kind) => Ok(kind),
        MenuChoice::Unimplemented(label) => Err(DashboardError::UnimplementedMetric(label)),
    }
}

/// Which dropdown is open and which entry is highlighted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    pub selected_group: usize,
    pub open: bool,
    pub highlighted: usize,
}

impl MenuState {
    pub fn group(&self) -> &'static MenuGroup {
        &METRIC_MENU[self.selected_group.min(METRIC_MENU.len() - 1)]
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.highlighted = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.highlighted = 0;
    }

    /// Move to the neighbouring dropdown. Only one can be open at a time.
    pub fn next_group(&mut self) {
        self.selected_group = (self.selected_group + 1) % METRIC_MENU.len();
        self.highlighted = 0;
    }

    pub fn previous_group(&mut self) {
        self.selected_group = if self.selected_group == 0 {
            METRIC_MENU.len() - 1
        } else {
            self.selected_group - 1
        };
        self.highlighted = 0;
    }

    pub fn next_option(&mut self) {
        let count = self.group().options.len();
        if count > 0 {
            self.highlighted = (self.highlighted + 1) % count;
        }
    }

    pub fn previous_option(&mut self) {
        let count = self.group().options.len();
        if count > 0 {
            self.highlighted = if self.highlighted == 0 { count - 1 } else { self.highlighted - 1 };
        }
    }

    /// Take the highlighted entry and close the dropdown
    pub fn choose(&mut self) -> Option<MenuChoice> {
        if !self.open {
            return None;
        }
        let choice = self.group().options.get(self.highlighted).map(MenuChoice::from);
        self.close();
        choice
    }
}
