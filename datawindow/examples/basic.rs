use std::sync::Arc;
use std::time::Duration;

use datawindow::{DataWindowProvider, ItemId, Record, SkipListSource, WindowOptions};

#[derive(Clone, Debug)]
struct Message {
    id: ItemId,
    text: String,
}

impl Record for Message {
    fn id(&self) -> ItemId {
        self.id
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> datawindow::Result<()> {
    // Example: a 12-item window over 1000 rows in a store that answers after 5ms.
    let rows = (0..1000)
        .map(|id| Message {
            id,
            text: format!("message #{id}"),
        })
        .collect();
    let source = Arc::new(SkipListSource::from_vec(rows, Duration::from_millis(5))?);

    let options = WindowOptions::new(12).with_on_change(Some(|state: datawindow::WindowState| {
        println!("changed: head={} len={} v{}", state.head_id, state.len, state.version);
    }));
    let provider = DataWindowProvider::new(source, options).await?;

    for _ in 0..3 {
        if let Some(entered) = provider.move_forward().await? {
            println!("entered: {}", entered.text);
        }
    }

    // Jumps are clamped so the window stays full.
    provider.set_data_window_position(995).await?;
    let ids: Vec<ItemId> = provider
        .get_data_window_items(None)
        .iter()
        .map(|m| m.id)
        .collect();
    println!("after jump: {ids:?}");

    // At the end of the data a move reports absence and leaves the window alone.
    assert!(provider.move_forward().await?.is_none());
    println!("total={} version={}", provider.total_count().await?, provider.version());
    Ok(())
}
