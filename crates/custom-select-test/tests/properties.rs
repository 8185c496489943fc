//! Property tests over random click sequences.

use custom_select_test::{Harness, WidgetFixture};
use proptest::prelude::*;

const WIDGETS: usize = 4;
const OPTIONS: usize = 3;

#[derive(Debug, Clone)]
enum Click {
    Trigger(usize),
    Option(usize, usize),
    Outside,
}

fn click() -> impl Strategy<Value = Click> {
    prop_oneof![
        (0..WIDGETS).prop_map(Click::Trigger),
        (0..WIDGETS, 0..OPTIONS).prop_map(|(w, o)| Click::Option(w, o)),
        Just(Click::Outside),
    ]
}

fn page() -> Harness {
    let mut harness = Harness::new();
    for w in 0..WIDGETS {
        let mut fixture = WidgetFixture::new(format!("w{w}"));
        for o in 0..OPTIONS {
            fixture = fixture.option(format!("v{o}"), format!("Label {o}"));
        }
        harness.add_widget(&fixture);
    }
    harness.add_element("p", "outside");
    harness.load();
    harness
}

fn widget(w: usize) -> String {
    format!("[data-name='w{w}']")
}

proptest! {
    #[test]
    fn prop_at_most_one_open(clicks in prop::collection::vec(click(), 0..40)) {
        let mut harness = page();
        for c in clicks {
            match c {
                Click::Trigger(w) => harness.open(&format!("w{w}")),
                Click::Option(w, o) => harness.choose(&format!("w{w}"), &format!("v{o}")),
                Click::Outside => harness.click("#outside"),
            };
            prop_assert!(harness.controller().open_widgets(harness.dom()).len() <= 1);
        }
    }

    #[test]
    fn prop_trigger_toggles_self_and_closes_rest(
        prefix in prop::collection::vec(click(), 0..20),
        target in 0..WIDGETS,
    ) {
        let mut harness = page();
        for c in prefix {
            match c {
                Click::Trigger(w) => harness.open(&format!("w{w}")),
                Click::Option(w, o) => harness.choose(&format!("w{w}"), &format!("v{o}")),
                Click::Outside => harness.click("#outside"),
            };
        }
        let was_open = harness.is_open(&widget(target));

        harness.open(&format!("w{target}"));

        prop_assert_eq!(harness.is_open(&widget(target)), !was_open);
        for other in (0..WIDGETS).filter(|&w| w != target) {
            prop_assert!(!harness.is_open(&widget(other)));
        }
    }

    #[test]
    fn prop_selection_mirrors_native(
        w in 0..WIDGETS,
        picks in prop::collection::vec(0..OPTIONS, 1..8),
    ) {
        let mut harness = page();
        let scope = widget(w);
        for (n, &o) in picks.iter().enumerate() {
            harness.open(&format!("w{w}"));
            harness.choose(&format!("w{w}"), &format!("v{o}"));

            harness.assert_count(&format!("{scope} .bm-custom-select-option.selected"), 1);
            harness.assert_count(
                &format!("{scope} .bm-custom-select-option.selected[data-value='v{o}']"),
                1,
            );
            prop_assert_eq!(harness.text(&format!("{scope} .bm-custom-select-value")), format!("Label {o}"));
            prop_assert_eq!(harness.value(&format!("{scope} select")), format!("v{o}"));
            prop_assert_eq!(harness.change_events(&format!("{scope} select")), n + 1);
            prop_assert!(!harness.is_open(&scope));
        }
    }
}
