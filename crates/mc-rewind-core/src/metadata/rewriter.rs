//! Ordered rule chain over entity metadata lists.
//!
//! Every entry runs through every rule whose filter matches, in registration
//! order. A rule sees the entry as left by the rules before it, so a family
//! rule that shifts indices changes what later index filters match. Entries
//! a rule synthesizes enter the chain at the rule after their creator and
//! are appended after the original entries.

use std::collections::{HashSet, VecDeque};

use mc_rewind_proto::{Metadata, Packet, Schema};

use crate::diagnostics::DiagnosticsSink;
use crate::entity::EntityKind;

/// What a rule decided for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaOutcome {
    /// Continue down the chain with the (possibly changed) entry.
    Keep,
    /// Drop the entry from the emitted list.
    Elide,
    /// Drop the whole packet carrying the list.
    CancelPacket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindFilter {
    Exact(EntityKind),
    Family(EntityKind),
}

/// Which entries a rule applies to. An empty filter matches everything,
/// including entries of entities whose kind is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetaFilter {
    kind: Option<KindFilter>,
    index: Option<u8>,
}

impl MetaFilter {
    pub fn any() -> Self {
        Self::default()
    }

    /// Only entities of exactly `kind`.
    pub fn kind(kind: EntityKind) -> Self {
        Self {
            kind: Some(KindFilter::Exact(kind)),
            index: None,
        }
    }

    /// Entities of `kind` or any of its descendants.
    pub fn family(kind: EntityKind) -> Self {
        Self {
            kind: Some(KindFilter::Family(kind)),
            index: None,
        }
    }

    pub fn index(mut self, index: u8) -> Self {
        self.index = Some(index);
        self
    }

    pub fn matches(&self, kind: Option<EntityKind>, index: u8) -> bool {
        if self.index.is_some_and(|i| i != index) {
            return false;
        }
        match (self.kind, kind) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(KindFilter::Exact(want)), Some(kind)) => kind == want,
            (Some(KindFilter::Family(want)), Some(kind)) => kind.is_or_has_parent(want),
        }
    }
}

/// Per-list state a rule can read and add to.
pub struct MetaContext<'a> {
    pub entity_id: i32,
    pub kind: Option<EntityKind>,
    diagnostics: &'a dyn DiagnosticsSink,
    created: Vec<Metadata>,
    packets: Vec<Packet>,
}

impl MetaContext<'_> {
    /// Add a new entry; it continues through the rules after the current one.
    pub fn create_meta(&mut self, meta: Metadata) {
        self.created.push(meta);
    }

    /// Emit a packet ahead of the one carrying this list.
    pub fn send_packet(&mut self, packet: Packet) {
        self.packets.push(packet);
    }

    pub fn warn(&self, message: &str) {
        self.diagnostics.warn(message);
    }
}

type Transform = Box<dyn Fn(&mut Metadata, &mut MetaContext<'_>) -> MetaOutcome + Send + Sync>;

pub struct MetaRule {
    filter: MetaFilter,
    transform: Transform,
}

/// A rewritten list and the packets its rules produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    Rewritten {
        entries: Vec<Metadata>,
        packets: Vec<Packet>,
    },
    CancelPacket,
}

pub struct MetadataRewriter {
    rules: Vec<MetaRule>,
    target: Schema,
}

impl MetadataRewriter {
    /// An empty chain producing lists for `target`.
    pub fn new(target: Schema) -> Self {
        Self {
            rules: Vec::new(),
            target,
        }
    }

    pub fn register<F>(&mut self, filter: MetaFilter, transform: F) -> &mut Self
    where
        F: Fn(&mut Metadata, &mut MetaContext<'_>) -> MetaOutcome + Send + Sync + 'static,
    {
        self.rules.push(MetaRule {
            filter,
            transform: Box::new(transform),
        });
        self
    }

    /// Elide every entry the filter matches.
    pub fn removed(&mut self, filter: MetaFilter) -> &mut Self {
        self.register(filter, |_, _| MetaOutcome::Elide)
    }

    /// Elide index `gap` and close it by shifting every higher index down.
    pub fn removed_with_shift(&mut self, filter: MetaFilter, gap: u8) -> &mut Self {
        self.register(filter, move |meta, _| {
            if meta.index == gap {
                MetaOutcome::Elide
            } else {
                if meta.index > gap {
                    meta.index -= 1;
                }
                MetaOutcome::Keep
            }
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rewrite(
        &self,
        entity_id: i32,
        kind: Option<EntityKind>,
        entries: Vec<Metadata>,
        diagnostics: &dyn DiagnosticsSink,
    ) -> ListOutcome {
        let mut ctx = MetaContext {
            entity_id,
            kind,
            diagnostics,
            created: Vec::new(),
            packets: Vec::new(),
        };
        let mut queue: VecDeque<(Metadata, usize)> = entries.into_iter().map(|m| (m, 0)).collect();
        let mut out = Vec::with_capacity(queue.len());

        while let Some((mut meta, start)) = queue.pop_front() {
            match self.run_chain(&mut meta, start, &mut ctx, &mut queue) {
                MetaOutcome::Keep => out.push(meta),
                MetaOutcome::Elide => {}
                MetaOutcome::CancelPacket => return ListOutcome::CancelPacket,
            }
        }

        let target = self.target;
        out.retain(|meta| {
            let known = meta.meta_type().is_known_to(target);
            if !known {
                diagnostics.warn(&format!(
                    "metadata {} of type {:?} has no {target} encoding (entity {entity_id})",
                    meta.index,
                    meta.meta_type(),
                ));
            }
            known
        });

        let mut seen = HashSet::new();
        out.retain(|meta| {
            let first = seen.insert(meta.index);
            if !first {
                diagnostics.warn(&format!(
                    "duplicate metadata index {} for entity {entity_id}, keeping the first",
                    meta.index
                ));
            }
            first
        });

        ListOutcome::Rewritten {
            entries: out,
            packets: ctx.packets,
        }
    }

    fn run_chain(
        &self,
        meta: &mut Metadata,
        start: usize,
        ctx: &mut MetaContext<'_>,
        queue: &mut VecDeque<(Metadata, usize)>,
    ) -> MetaOutcome {
        for (i, rule) in self.rules.iter().enumerate().skip(start) {
            if !rule.filter.matches(ctx.kind, meta.index) {
                continue;
            }
            let outcome = (rule.transform)(meta, ctx);
            for created in ctx.created.drain(..) {
                queue.push_back((created, i + 1));
            }
            if outcome != MetaOutcome::Keep {
                return outcome;
            }
        }
        MetaOutcome::Keep
    }
}
