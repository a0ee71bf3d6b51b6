//! Per-packet-id remapping rules and the dispatch loop.
//!
//! A [`PacketRemapper`] is an ordered list of steps: field operations on the
//! packet's [`PacketWrapper`] and handlers that consult or update connection
//! state. [`Protocol::process`] runs the rule registered for a packet id and
//! flattens the result into the packets to send, in order.

use std::collections::HashMap;
use std::sync::Arc;

use mc_rewind_proto::{FieldType, FieldValue, Packet, PacketWrapper, WrapperOutput};
use tracing::{debug, trace};

use crate::context::ConnectionContext;
use crate::diagnostics::DiagnosticsSink;
use crate::entity::EntityMappings;
use crate::error::RewriteError;
use crate::metadata::MetadataRewriter;
use crate::remapper::BlockItemRemapper;
use crate::tables::MappingTables;

/// Read-only collaborators shared by every connection.
pub struct Shared {
    pub remapper: Arc<dyn BlockItemRemapper>,
    pub entities: EntityMappings,
    pub metadata: MetadataRewriter,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
    pub tables: Arc<MappingTables>,
}

/// What a handler can reach while rewriting one packet.
pub struct HandlerContext<'a> {
    pub conn: &'a mut ConnectionContext,
    pub shared: &'a Shared,
}

impl HandlerContext<'_> {
    pub fn warn(&self, message: &str) {
        self.shared.diagnostics.warn(message);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Read and re-emit unchanged.
    Passthrough(FieldType),
    /// Read as the first type, emit as the second.
    Map(FieldType, FieldType),
    /// Read and discard.
    Read(FieldType),
    /// Emit a new field.
    Write(FieldValue),
}

impl FieldOp {
    fn apply(&self, wrapper: &mut PacketWrapper) -> Result<(), RewriteError> {
        match self {
            FieldOp::Passthrough(ty) => {
                wrapper.passthrough(*ty)?;
            }
            FieldOp::Map(from, to) => {
                wrapper.map(*from, *to)?;
            }
            FieldOp::Read(ty) => {
                wrapper.read(*ty)?;
            }
            FieldOp::Write(value) => wrapper.write(value.clone()),
        }
        Ok(())
    }
}

pub type Handler = Box<
    dyn Fn(&mut PacketWrapper, &mut HandlerContext<'_>) -> Result<(), RewriteError> + Send + Sync,
>;

pub enum Step {
    Field(FieldOp),
    Handler(Handler),
}

/// The rewrite for one packet id.
pub struct PacketRemapper {
    target_id: u32,
    steps: Vec<Step>,
}

impl PacketRemapper {
    /// A rule whose output carries `target_id`.
    pub fn new(target_id: u32) -> Self {
        Self {
            target_id,
            steps: Vec::new(),
        }
    }

    pub fn passthrough(mut self, ty: FieldType) -> Self {
        self.steps.push(Step::Field(FieldOp::Passthrough(ty)));
        self
    }

    pub fn map(mut self, from: FieldType, to: FieldType) -> Self {
        self.steps.push(Step::Field(FieldOp::Map(from, to)));
        self
    }

    pub fn read(mut self, ty: FieldType) -> Self {
        self.steps.push(Step::Field(FieldOp::Read(ty)));
        self
    }

    pub fn write(mut self, value: FieldValue) -> Self {
        self.steps.push(Step::Field(FieldOp::Write(value)));
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut PacketWrapper, &mut HandlerContext<'_>) -> Result<(), RewriteError>
            + Send
            + Sync
            + 'static,
    {
        self.steps.push(Step::Handler(Box::new(handler)));
        self
    }

    pub fn target_id(&self) -> u32 {
        self.target_id
    }

    /// Run every step in order, stopping once the packet is cancelled.
    fn apply(
        &self,
        wrapper: &mut PacketWrapper,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<(), RewriteError> {
        wrapper.set_id(self.target_id);
        for step in &self.steps {
            if wrapper.is_cancelled() {
                break;
            }
            match step {
                Step::Field(op) => op.apply(wrapper)?,
                Step::Handler(handler) => handler(wrapper, ctx)?,
            }
        }
        Ok(())
    }
}

/// Treatment of packet ids with no registered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unregistered {
    /// Forward byte for byte under the same id.
    #[default]
    PassThrough,
    /// Drop silently.
    Cancel,
}

pub struct Protocol {
    rules: HashMap<u32, PacketRemapper>,
    unregistered: Unregistered,
    shared: Shared,
}

impl Protocol {
    pub fn new(shared: Shared, unregistered: Unregistered) -> Self {
        Self {
            rules: HashMap::new(),
            unregistered,
            shared,
        }
    }

    /// Register the rule for incoming packet id `id`, replacing any earlier one.
    pub fn register(&mut self, id: u32, remapper: PacketRemapper) {
        self.rules.insert(id, remapper);
    }

    pub fn is_registered(&self, id: u32) -> bool {
        self.rules.contains_key(&id)
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Rewrite one packet. Returns the packets to send, in order; empty when
    /// the packet was cancelled or could not be decoded.
    pub fn process(&self, conn: &mut ConnectionContext, packet: Packet) -> Vec<Packet> {
        self.rewrite(conn, packet).into_packets()
    }

    /// Like [`Protocol::process`], keeping the rewritten packet apart from
    /// the companions queued around it.
    pub fn rewrite(&self, conn: &mut ConnectionContext, packet: Packet) -> WrapperOutput {
        let id = packet.id;
        let Some(remapper) = self.rules.get(&id) else {
            trace!("packet 0x{id:02X} has no rule ({:?})", self.unregistered);
            return match self.unregistered {
                Unregistered::PassThrough => WrapperOutput {
                    primary: Some(packet),
                    ..WrapperOutput::default()
                },
                Unregistered::Cancel => WrapperOutput::default(),
            };
        };

        let mut wrapper = PacketWrapper::new(packet);
        let mut ctx = HandlerContext {
            conn,
            shared: &self.shared,
        };
        let result = remapper
            .apply(&mut wrapper, &mut ctx)
            .and_then(|()| Ok(wrapper.finish()?));
        match result {
            Ok(output) => {
                if output.primary.is_none() {
                    debug!("packet 0x{id:02X} cancelled");
                }
                output
            }
            Err(e) => {
                self.shared
                    .diagnostics
                    .warn(&format!("dropping packet 0x{id:02X}: {e}"));
                WrapperOutput::default()
            }
        }
    }
}
