// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The hand-off between worker threads and the delivery context.

use std::time::Duration;

use swatch_core::{ComputeError, Handle};

/// A finished computation travelling back to the delivery context.
#[derive(Debug)]
pub struct Delivery<C, K, V> {
    /// The consumer that requested the value.
    pub consumer: C,
    /// The key the value was computed for.
    pub key: K,
    /// The computed value, or why it could not be produced.
    pub result: Result<Handle<V>, ComputeError>,
}

/// A multi-producer, single-consumer channel of [`Delivery`] messages.
///
/// Workers publish through cloned [`DeliveryPublisher`]s; only the owner of the bus
/// drains it, which makes the owner's thread the delivery context.
#[derive(Debug)]
pub struct DeliveryBus<T> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T> DeliveryBus<T> {
    /// Creates a bus backed by an unbounded channel.
    ///
    /// ## Returns
    /// A new, empty bus.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Publishes a message, logging an error if the receiver is disconnected.
    ///
    /// ## Arguments
    /// * `message` - The message to be sent over the channel.
    pub fn publish(&self, message: T) {
        publish_on(&self.sender, message);
    }

    /// Returns a publishing handle for worker threads.
    /// It logs a failed send the same way [`DeliveryBus::publish`] does.
    ///
    /// ## Returns
    /// A publisher backed by a clone of the sender end of the channel.
    pub fn publisher(&self) -> DeliveryPublisher<T> {
        DeliveryPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Takes the next message without waiting.
    pub fn try_next(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next message.
    pub fn next_timeout(&self, timeout: Duration) -> Option<T> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Number of messages waiting.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no message is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T> Default for DeliveryBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The sending half of a [`DeliveryBus`], handed to worker threads.
#[derive(Debug)]
pub struct DeliveryPublisher<T> {
    sender: flume::Sender<T>,
}

impl<T> DeliveryPublisher<T> {
    /// Publishes a message, logging an error if the receiver is disconnected.
    ///
    /// ## Arguments
    /// * `message` - The message to be sent over the channel.
    pub fn publish(&self, message: T) {
        publish_on(&self.sender, message);
    }
}

impl<T> Clone for DeliveryPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

fn publish_on<T>(sender: &flume::Sender<T>, message: T) {
    if let Err(e) = sender.send(message) {
        log::error!("Failed to publish delivery: {e}. Receiver likely disconnected.");
    }
}
