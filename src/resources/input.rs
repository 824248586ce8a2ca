//! Command queue bridging the collaborator's input with the ECS world.
//!
//! Any number of producers hold a [`CommandSender`]; the world owns the
//! receiving side and drains it once per tick in
//! [`apply_engine_commands`](crate::systems::tick::apply_engine_commands).
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use log::debug;

use crate::events::input::EngineCommand;

/// Producer end of the queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<EngineCommand>,
}

impl CommandSender {
    /// Queue a command. Returns false once the world side is gone.
    pub fn send(&self, command: EngineCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

#[derive(Resource, Debug)]
pub struct CommandQueue {
    tx: Sender<EngineCommand>,
    rx: Receiver<EngineCommand>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<EngineCommand>();
        Self { tx, rx }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    pub fn push(&self, command: EngineCommand) {
        // The receiver lives in `self`, so the send cannot fail.
        let _ = self.tx.send(command);
    }

    /// Take every queued command in arrival order.
    pub fn drain(&self) -> Vec<EngineCommand> {
        let mut commands = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(command) => commands.push(command),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if !commands.is_empty() {
            debug!("Drained {} engine command(s)", commands.len());
        }
        commands
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
