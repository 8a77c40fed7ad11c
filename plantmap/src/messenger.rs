//! Notifications sent to the hosting UI when layer contents change.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::layer::LayerKind;

/// Receives a notification every time the rendered contents of a layer change. The hosting map
/// widget is expected to read the new contents with
/// [`LayerSyncController::layers`](crate::LayerSyncController::layers) and redraw the layer.
pub trait Messenger: Send + Sync {
    /// Called once per changed layer after the controller has stored the new contents.
    fn layer_changed(&self, layer: LayerKind);
}

/// Messenger that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn layer_changed(&self, _layer: LayerKind) {}
}

impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    fn layer_changed(&self, layer: LayerKind) {
        (**self).layer_changed(layer)
    }
}

impl Messenger for UnboundedSender<LayerKind> {
    fn layer_changed(&self, layer: LayerKind) {
        if self.send(layer).is_err() {
            log::debug!("Layer change receiver is closed, {layer:?} update is dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_messenger_forwards_layers() {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        sender.layer_changed(LayerKind::Heatmap);
        sender.layer_changed(LayerKind::Stations);

        assert_eq!(receiver.try_recv().ok(), Some(LayerKind::Heatmap));
        assert_eq!(receiver.try_recv().ok(), Some(LayerKind::Stations));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        drop(receiver);
        sender.layer_changed(LayerKind::PlantMarkers);
    }
}
