// SPDX-License-Identifier: GPL-3.0-only

mod common;

use std::fs;

use common::Rig;
use recovery_testing::{FakeCatalog, ScriptedPrompt};

#[test]
fn marker_skips_the_prompt_for_any_label() {
    let rig = Rig::new(FakeCatalog::mtd_device());
    rig.bypass_confirmations();

    let mut prompt = ScriptedPrompt::new([]);
    for (title, label) in [
        ("Confirm format?", "Yes - Format"),
        ("", ""),
        ("Confirm restore?", "No"),
    ] {
        assert!(rig.gate.confirm_selection(&mut prompt, title, label));
    }
    assert!(prompt.menus.is_empty());
}

#[test]
fn without_marker_only_the_affirmative_item_confirms() {
    let rig = Rig::new(FakeCatalog::mtd_device());

    let mut prompt = ScriptedPrompt::new([Some(1), Some(0), None]);
    assert!(rig.gate.confirm_selection(&mut prompt, "Confirm wipe?", "Yes - Wipe"));
    assert!(!rig.gate.confirm_selection(&mut prompt, "Confirm wipe?", "Yes - Wipe"));
    assert!(!rig.gate.confirm_selection(&mut prompt, "Confirm wipe?", "Yes - Wipe"));

    let menu = prompt.last_menu().expect("confirmation shown");
    assert_eq!(menu.headers[0], "Confirm wipe?");
    assert_eq!(menu.items, vec!["No".to_string(), "Yes - Wipe".to_string()]);
}

#[test]
fn marker_is_checked_on_every_call() {
    let rig = Rig::new(FakeCatalog::mtd_device());
    let mut prompt = ScriptedPrompt::new([Some(0)]);

    rig.bypass_confirmations();
    assert!(rig.gate.confirm_selection(&mut prompt, "Confirm?", "Yes"));
    assert!(prompt.menus.is_empty());

    fs::remove_file(rig.layout.no_confirm_marker_path()).expect("remove marker");
    assert!(!rig.gate.confirm_selection(&mut prompt, "Confirm?", "Yes"));
    assert_eq!(prompt.menus.len(), 1);
}
