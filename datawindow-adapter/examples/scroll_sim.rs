use std::sync::Arc;
use std::time::Duration;

use datawindow::{ItemId, Record, SkipListSource};
use datawindow_adapter::{ScrollController, ScrollEffect, ViewportOptions, WheelDelta};

#[derive(Clone, Debug)]
struct Row {
    id: ItemId,
}

impl Record for Row {
    fn id(&self) -> ItemId {
        self.id
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> datawindow::Result<()> {
    // Example: replay a stream of wheel events against a 40px-row list and print what a
    // renderer would have to redraw.
    //
    // A real adapter would:
    // - feed wheel/touch events into the controller
    // - redraw only the slot reported by `ScrollEffect::Shifted`, or every slot on `Resynced`
    // - apply `translate_y` to the container of slots
    let source = Arc::new(SkipListSource::from_vec(
        (0..200).map(|id| Row { id }).collect(),
        Duration::from_millis(2),
    )?);
    let viewport = ViewportOptions::new(40.0, 8, 4);
    let mut c = ScrollController::connect(source, viewport).await?;
    println!(
        "slot container: {} rows, {}px tall",
        viewport.window_size(),
        viewport.content_height()
    );

    let wheel = [
        WheelDelta::Pixels(30.0),
        WheelDelta::Pixels(30.0),
        WheelDelta::Lines(3.0),
        WheelDelta::Pixels(-25.0),
        WheelDelta::Lines(-2.0),
        WheelDelta::Lines(-2.0),
    ];
    for delta in wheel {
        match c.on_wheel(delta).await? {
            ScrollEffect::Shifted { direction, slot } => {
                let item = c.slots()[slot].id;
                println!("{delta:?}: shifted {direction:?}, redraw slot {slot} with row {item}");
            }
            effect => println!("{delta:?}: {effect:?}"),
        }
        println!("  state={:?}", c.scroll_state());
    }

    c.jump_to(150).await?;
    c.for_each_slot(|s| {
        if s.index < 3 {
            println!("slot {} -> row {} at y={}", s.slot, s.item.id, s.y);
        }
    });
    Ok(())
}
