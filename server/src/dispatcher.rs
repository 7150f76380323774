//! Routing of decoded packets to registered message handlers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::thread;

use log::trace;

use oscine_shared::{Bundle, Message, Packet};

use crate::error::RegisterError;
use crate::pattern;

/// Characters that may not appear in a registered address: they are
/// reserved for pattern syntax (plus the literal space).
const RESERVED_ADDRESS_CHARS: &[char] = &['*', '?', ',', '[', ']', '{', '}', '#', ' '];

/// A registered OSC message handler.
///
/// Handlers may be invoked from several dispatch threads at once and
/// must be thread safe; no mutual exclusion between handlers is
/// provided or implied.
pub trait Handler: Send + Sync {
    fn handle(&self, message: &Message);
}

impl<F> Handler for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn handle(&self, message: &Message) {
        self(message)
    }
}

/// Routes decoded messages to handlers registered under literal
/// addresses. Cheap to clone; clones share one registry.
///
/// Note the direction of matching: the *incoming* message address is
/// interpreted as the pattern and tested against each
/// registered literal address, not the other way around. Typical OSC
/// usage inverts this; callers relying on registered-side wildcards
/// should match in their own handler instead.
#[derive(Clone)]
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<String, Arc<dyn Handler>>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers `handler` under a literal `address`. The address may
    /// not contain pattern syntax and may not already be registered;
    /// both mistakes are reported here, at setup time.
    pub fn register(
        &self,
        address: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), RegisterError> {
        if let Some(offending) = address.chars().find(|c| RESERVED_ADDRESS_CHARS.contains(c)) {
            return Err(RegisterError::InvalidAddressPattern {
                address: address.to_string(),
                offending,
            });
        }

        let mut handlers = self.handlers.write().expect("handler registry poisoned");
        if handlers.contains_key(address) {
            return Err(RegisterError::DuplicateAddress {
                address: address.to_string(),
            });
        }
        handlers.insert(address.to_string(), Arc::new(handler));
        Ok(())
    }

    /// Dispatches one decoded packet. A message is routed on the
    /// calling thread; a bundle is handed to a scheduler thread that
    /// waits out its time tag, so this call never blocks on handler
    /// execution or bundle delay.
    pub fn dispatch(&self, packet: &Packet) {
        match packet {
            Packet::Message(message) => self.dispatch_message(message),
            Packet::Bundle(bundle) => self.schedule_bundle(bundle.clone()),
        }
    }

    fn dispatch_message(&self, message: &Message) {
        let Some(regex) = pattern::compile(&message.address) else {
            return;
        };

        // collect matches first so handlers run outside the read lock
        let matched: Vec<Arc<dyn Handler>> = {
            let handlers = self.handlers.read().expect("handler registry poisoned");
            handlers
                .iter()
                .filter(|(address, _)| regex.is_match(address))
                .map(|(_, handler)| Arc::clone(handler))
                .collect()
        };

        trace!(
            "dispatching {:?} to {} handler(s)",
            message.address,
            matched.len()
        );
        for handler in matched {
            handler.handle(message);
        }
    }

    /// Defers a bundle until its time tag falls due, then dispatches
    /// its child messages followed by its nested bundles. Runs on its
    /// own thread; an immediate or overdue tag skips the sleep.
    fn schedule_bundle(&self, bundle: Bundle) {
        let delay = bundle.timetag.time_until_due();
        let dispatcher = self.clone();
        thread::spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            for message in &bundle.messages {
                dispatcher.dispatch_message(message);
            }
            for child in bundle.bundles {
                dispatcher.schedule_bundle(child);
            }
        });
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
