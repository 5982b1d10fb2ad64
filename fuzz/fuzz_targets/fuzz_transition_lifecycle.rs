#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stackfold_layout::{
    AmbientState, FirstItemMaxHeight, StackEntry, StackLayoutConfig, StackScrollAlgorithm,
};

#[derive(Arbitrary, Debug)]
enum Step {
    SetExpanded(bool),
    Start,
    Stop,
    DropFirst,
    Reset { index: u8, measured: bool },
    Complete { ticket: u8, height: u16 },
    Pass { scroll_y: i16 },
}

fuzz_target!(|input: (Vec<u16>, Vec<Step>)| {
    let (heights, steps) = input;
    if heights.len() > 64 || steps.len() > 128 {
        return;
    }
    let Ok(mut engine) = StackScrollAlgorithm::new(StackLayoutConfig::default()) else {
        return;
    };
    let mut items: Vec<StackEntry> = heights
        .iter()
        .enumerate()
        .map(|(i, h)| StackEntry::new(i as u64, i32::from(h % 1024)).measured(h % 3 != 0))
        .collect();
    let mut tickets = Vec::new();

    for step in steps {
        match step {
            Step::SetExpanded(expanded) => engine.set_is_expanded(expanded),
            Step::Start => tickets.extend(engine.on_expansion_started(&items)),
            Step::Stop => engine.on_expansion_stopped(),
            Step::DropFirst => {
                if !items.is_empty() {
                    items.remove(0);
                }
                tickets.extend(engine.notify_children_changed(&items));
            }
            Step::Reset { index, measured } => {
                if let Some(item) = items.get(usize::from(index)) {
                    let item = item.clone().measured(measured);
                    tickets.extend(engine.on_reset(&item));
                }
            }
            Step::Complete { ticket, height } => {
                if tickets.is_empty() {
                    continue;
                }
                let ticket = tickets.remove(usize::from(ticket) % tickets.len());
                let measured = StackEntry::new(ticket.item().0, i32::from(height % 1024));
                engine.complete_measurement(ticket, &measured);
            }
            Step::Pass { scroll_y } => {
                let out = engine.compute(&items, &AmbientState::new(800).scroll_y(i32::from(scroll_y)));
                assert!(out.iter().all(|(_, s)| s.height >= 64));
            }
        }
        // A transition that is not running never caps anything.
        let transition = engine.transition();
        if !transition.is_changing() {
            assert_eq!(transition.first_item(), None);
            assert_ne!(transition.max_height(), FirstItemMaxHeight::Pending);
        }
    }
});
