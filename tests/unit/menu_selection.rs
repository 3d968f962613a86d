//! Metric menu navigation and label lookup

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use test_log::test;

use ratio_dashboard::models::RatioKind;
use ratio_dashboard::ui::menu::{choice_for_label, MenuChoice, MenuState, MenuTarget, METRIC_MENU};

#[test]
fn test_every_ratio_appears_once_in_the_menu() {
    let kinds: Vec<RatioKind> = METRIC_MENU
        .iter()
        .flat_map(|group| group.options.iter())
        .filter_map(|option| match option.target {
            MenuTarget::Ratio(kind) => Some(kind),
            MenuTarget::Unimplemented => None,
        })
        .collect();
    assert_eq!(kinds, RatioKind::ALL.to_vec());
}

#[test]
fn test_labels_map_to_choices() {
    assert_eq!(choice_for_label("Current Ratio"), MenuChoice::Ratio(RatioKind::CurrentRatio));
    assert_eq!(choice_for_label("Inventory Turnover"), MenuChoice::Ratio(RatioKind::InventoryTurnover));
    assert_eq!(choice_for_label("P/E Ratio"), MenuChoice::Unimplemented("P/E Ratio".to_string()));
    assert_matches!(choice_for_label("Dividend Yield"), MenuChoice::Unimplemented(label) if label == "Dividend Yield");
}

#[test]
fn test_navigate_to_valuation_and_choose() {
    let mut menu = MenuState::default();
    for _ in 0..METRIC_MENU.len() - 1 {
        menu.next_group();
    }
    assert_eq!(menu.group().label, "Valuation");

    menu.toggle();
    menu.next_option();
    assert_eq!(menu.choose(), Some(MenuChoice::Unimplemented("P/B Ratio".to_string())));
    assert!(!menu.open);
}
