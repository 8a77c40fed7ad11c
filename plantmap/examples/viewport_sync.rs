//! This example loads all three layers for a view over San Francisco, applies a technology filter
//! and prints what the map would draw.
//!
//! Run the station service on port 5000 and the plant service on port 8000, or pass a base URL
//! of a server hosting both as the first argument.

use plantmap::config::ServiceConfig;
use plantmap::layer::MapLayers;
use plantmap::plantmap_types::{latlon, ViewportBounds};
use plantmap::{ControllerBuilder, FilterSet, LayerKind, LayerVisibility};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(base_url) => ServiceConfig::with_base_url(&base_url),
        None => ServiceConfig::default(),
    };

    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let controller = ControllerBuilder::http(config)
        .expect("failed to create HTTP client")
        .with_visibility(LayerVisibility::all())
        .with_messenger(sender)
        .build();

    tokio::spawn(async move {
        while let Some(layer) = receiver.recv().await {
            println!("redraw {layer:?}");
        }
    });

    let bounds = ViewportBounds::from_coords(37.6, -122.6, 37.9, -122.2).expect("valid bounds");
    let report = controller.on_viewport_settled(bounds).await;
    println!("{report:?}");
    print_layers(&controller.layers());

    controller.on_filter_changed(FilterSet::from_iter(["solar", "wind"]));
    print_layers(&controller.layers());

    let report = controller.on_visibility_toggled(LayerKind::Stations).await;
    println!("{report:?}");

    controller
        .on_map_clicked(latlon!(37.7749, -122.4194))
        .await;
}

fn print_layers(layers: &MapLayers) {
    for layer in LayerKind::ALL {
        println!("{layer:?}: {} items", layers.len(layer));
    }
}
