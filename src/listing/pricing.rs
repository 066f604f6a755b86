use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::error::ApiResult;
use crate::api::traits::PropertyApi;
use crate::models::{DateRange, PriceQuote, PropertyId, PropertySummary};

/// Round a money amount to whole cents, halves away from zero
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price text a card shows
#[derive(Debug, Clone, PartialEq)]
pub enum PriceDisplay {
    Base { per_night: Decimal, currency: String },
    Calculating,
    Quoted(PriceQuote),
}

impl PriceDisplay {
    /// `"<n> nights"` badge for a quoted card
    pub fn nights_badge(&self) -> Option<String> {
        match self {
            PriceDisplay::Quoted(quote) => Some(format!("{} nights", quote.nights)),
            _ => None,
        }
    }
}

impl fmt::Display for PriceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceDisplay::Base {
                per_night,
                currency,
            } => write!(f, "{per_night} {currency}/night"),
            PriceDisplay::Calculating => f.write_str("Calculating..."),
            PriceDisplay::Quoted(q) => write!(
                f,
                "{:.2} {} total · {:.2} {}/night avg",
                to_cents(q.total),
                q.currency,
                to_cents(q.average_per_night),
                q.currency
            ),
        }
    }
}

#[derive(Debug)]
enum SlotState {
    Calculating,
    Quoted(PriceQuote),
    /// The lookup failed; the card falls back to its base price
    Unavailable,
}

struct Slot {
    range: DateRange,
    /// Identifies the lookup this slot is waiting for
    ticket: u64,
    state: SlotState,
    task: Option<JoinHandle<()>>,
}

impl Slot {
    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug)]
struct QuoteOutcome {
    property_id: PropertyId,
    ticket: u64,
    range: DateRange,
    /// `None` when the lookup ended without an answer (panicked or aborted)
    result: Option<ApiResult<PriceQuote>>,
}

/// Sends the lookup's outcome when dropped, so a lookup that panics or is
/// aborted still reports back.
struct Reply {
    tx: mpsc::UnboundedSender<QuoteOutcome>,
    property_id: PropertyId,
    ticket: u64,
    range: DateRange,
    result: Option<ApiResult<PriceQuote>>,
}

impl Drop for Reply {
    fn drop(&mut self) {
        let _ = self.tx.send(QuoteOutcome {
            property_id: self.property_id,
            ticket: self.ticket,
            range: self.range,
            result: self.result.take(),
        });
    }
}

/// Per-card price lookups for the visible page.
///
/// Each card gets its own task keyed by (property id, date range). Changing
/// the range aborts the old task and any reply from an earlier lookup is
/// ignored, so a card never shows a quote for dates that are no longer
/// selected. A failed lookup only affects its own card.
///
/// [`PriceBoard::sync`] spawns tasks and must run inside a tokio runtime.
pub struct PriceBoard<A: PropertyApi + 'static> {
    api: Arc<A>,
    slots: HashMap<PropertyId, Slot>,
    next_ticket: u64,
    tx: mpsc::UnboundedSender<QuoteOutcome>,
    rx: mpsc::UnboundedReceiver<QuoteOutcome>,
}

impl<A: PropertyApi + 'static> PriceBoard<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            slots: HashMap::new(),
            next_ticket: 0,
            tx,
            rx,
        }
    }

    /// Number of cards still waiting for a quote
    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s.state, SlotState::Calculating))
            .count()
    }

    /// Bring lookups in line with the visible cards and the selected range
    pub fn sync(&mut self, properties: &[PropertySummary], range: Option<DateRange>) {
        let Some(range) = range else {
            for slot in self.slots.values_mut() {
                slot.abort();
            }
            self.slots.clear();
            return;
        };

        let visible: HashSet<PropertyId> = properties.iter().map(|p| p.id).collect();
        self.slots.retain(|id, slot| {
            let keep = visible.contains(id);
            if !keep {
                slot.abort();
            }
            keep
        });

        for property in properties {
            if self.slots.get(&property.id).map(|s| s.range) == Some(range) {
                continue;
            }
            if let Some(mut old) = self.slots.remove(&property.id) {
                old.abort();
            }

            // Old quote is gone before the new request starts
            self.next_ticket += 1;
            let ticket = self.next_ticket;
            let task = self.spawn_lookup(property.id, ticket, range);
            self.slots.insert(
                property.id,
                Slot {
                    range,
                    ticket,
                    state: SlotState::Calculating,
                    task: Some(task),
                },
            );
        }
    }

    fn spawn_lookup(&self, property_id: PropertyId, ticket: u64, range: DateRange) -> JoinHandle<()> {
        debug!("Requesting quote for property {} ({})", property_id, range);
        let api = Arc::clone(&self.api);
        let mut reply = Reply {
            tx: self.tx.clone(),
            property_id,
            ticket,
            range,
            result: None,
        };
        tokio::spawn(async move {
            let result = api
                .calculate_price(property_id, range)
                .await
                .map(PriceQuote::from);
            reply.result = Some(result);
        })
    }

    fn apply(&mut self, outcome: QuoteOutcome) -> bool {
        let Some(slot) = self.slots.get_mut(&outcome.property_id) else {
            debug!("Quote for hidden property {} dropped", outcome.property_id);
            return false;
        };
        if slot.ticket != outcome.ticket {
            debug!(
                "Stale quote for property {} ({}) dropped",
                outcome.property_id, outcome.range
            );
            return false;
        }

        slot.task = None;
        slot.state = match outcome.result {
            Some(Ok(quote)) => SlotState::Quoted(quote),
            Some(Err(err)) => {
                warn!(
                    "Error calculating price for property {}: {}",
                    outcome.property_id, err
                );
                SlotState::Unavailable
            }
            None => {
                warn!(
                    "Price lookup for property {} ended without an answer",
                    outcome.property_id
                );
                SlotState::Unavailable
            }
        };
        true
    }

    /// Apply whatever lookups have already finished; returns how many landed
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until every visible card has a quote or has fallen back
    pub async fn settle(&mut self) {
        // The board holds a sender, so `recv` never yields `None`; every
        // pending slot's `Reply` reports back when its task ends.
        while self.pending() > 0 {
            if let Some(outcome) = self.rx.recv().await {
                self.apply(outcome);
            }
        }
    }

    pub fn quote(&self, id: PropertyId) -> Option<&PriceQuote> {
        match self.slots.get(&id).map(|s| &s.state) {
            Some(SlotState::Quoted(quote)) => Some(quote),
            _ => None,
        }
    }

    pub fn display(&self, property: &PropertySummary) -> PriceDisplay {
        match self.slots.get(&property.id).map(|s| &s.state) {
            Some(SlotState::Calculating) => PriceDisplay::Calculating,
            Some(SlotState::Quoted(quote)) => PriceDisplay::Quoted(quote.clone()),
            Some(SlotState::Unavailable) | None => PriceDisplay::Base {
                per_night: property.base_price_per_night,
                currency: property.currency.clone(),
            },
        }
    }
}

impl<A: PropertyApi + 'static> Drop for PriceBoard<A> {
    fn drop(&mut self) {
        for slot in self.slots.values_mut() {
            slot.abort();
        }
    }
}
