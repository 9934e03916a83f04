use crate::sensor_interface::image::IntensityImage;
use crate::telemetry::log::LogManager;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub type SubscriptionId = u64;
pub type ImageReceiver = UnboundedReceiver<Arc<IntensityImage>>;

struct Registry {
    next_id: SubscriptionId,
    listeners: BTreeMap<SubscriptionId, UnboundedSender<Arc<IntensityImage>>>,
}

/// Fans finished images out to any number of listeners.
pub struct ImageBroadcaster {
    registry: Mutex<Registry>,
    logger: LogManager,
}

impl ImageBroadcaster {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_id: 1,
                listeners: BTreeMap::new(),
            }),
            logger: LogManager::new("broadcast"),
        }
    }

    pub fn subscribe(&self) -> (SubscriptionId, ImageReceiver) {
        let (sender, receiver) = unbounded_channel();
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, sender);
        self.logger.record(&format!("listener {} subscribed", id));
        (id, receiver)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.lock().listeners.remove(&id).is_some();
        if removed {
            self.logger.record(&format!("listener {} unsubscribed", id));
        }
        removed
    }

    pub fn unsubscribe_all(&self) {
        self.lock().listeners.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Delivers `image` to every live listener and returns how many received
    /// it. Listeners whose receiver was dropped are removed; the rest still
    /// get the image.
    pub fn publish(&self, image: Arc<IntensityImage>) -> usize {
        let mut registry = self.lock();
        let mut closed = Vec::new();
        let mut delivered = 0;
        for (&id, sender) in registry.listeners.iter() {
            if sender.send(Arc::clone(&image)).is_ok() {
                delivered += 1;
            } else {
                closed.push(id);
            }
        }
        for id in closed {
            self.logger
                .warn(&format!("listener {} went away, dropping it", id));
            registry.listeners.remove(&id);
        }
        delivered
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ImageBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn image(value: u8) -> Arc<IntensityImage> {
        Arc::new(IntensityImage::new(Array2::from_elem((2, 2), value)))
    }

    #[test]
    fn subscription_ids_increase_from_one() {
        let broadcaster = ImageBroadcaster::new();
        let (first, _a) = broadcaster.subscribe();
        let (second, _b) = broadcaster.subscribe();
        assert_eq!((first, second), (1, 2));
        assert_eq!(broadcaster.subscriber_count(), 2);
    }

    #[test]
    fn publish_reaches_every_listener() {
        let broadcaster = ImageBroadcaster::new();
        let (_, mut a) = broadcaster.subscribe();
        let (_, mut b) = broadcaster.subscribe();

        assert_eq!(broadcaster.publish(image(5)), 2);
        assert_eq!(a.try_recv().unwrap().to_bytes(), vec![5; 4]);
        assert_eq!(b.try_recv().unwrap().to_bytes(), vec![5; 4]);
    }

    #[test]
    fn unsubscribed_listener_gets_nothing() {
        let broadcaster = ImageBroadcaster::new();
        let (id, mut a) = broadcaster.subscribe();
        assert!(broadcaster.unsubscribe(id));
        assert!(!broadcaster.unsubscribe(id));
        assert_eq!(broadcaster.publish(image(1)), 0);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn dropped_receivers_are_pruned_without_blocking_others() {
        let broadcaster = ImageBroadcaster::new();
        let (_, gone) = broadcaster.subscribe();
        let (_, mut alive) = broadcaster.subscribe();
        drop(gone);

        assert_eq!(broadcaster.publish(image(3)), 1);
        assert_eq!(broadcaster.subscriber_count(), 1);
        assert!(alive.try_recv().is_ok());

        broadcaster.unsubscribe_all();
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
