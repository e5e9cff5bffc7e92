//! In-character responses spoken by a trader.
//!
//! Each outcome of a purchase attempt has its own non-empty set of phrase
//! keys. One key is drawn uniformly at random whenever the trader speaks.

use bazaar_types::PhraseKey;
use rand::Rng;

use crate::error::TraderError;

/// Which situation the trader is reacting to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeechKind {
    /// The requested product is sold out.
    NoStock,
    /// The buyer could not cover the price.
    InsufficientPayment,
    /// A purchase completed.
    ThankYou,
}

/// The three phrase sets a trader draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechLines {
    no_stock: Vec<PhraseKey>,
    insufficient_payment: Vec<PhraseKey>,
    thank_you: Vec<PhraseKey>,
}

impl SpeechLines {
    /// Build a speech table. Every set must be non-empty.
    pub fn new(
        no_stock: Vec<PhraseKey>,
        insufficient_payment: Vec<PhraseKey>,
        thank_you: Vec<PhraseKey>,
    ) -> Result<Self, TraderError> {
        if no_stock.is_empty() {
            return Err(TraderError::EmptySpeechLines { set: "no_stock" });
        }
        if insufficient_payment.is_empty() {
            return Err(TraderError::EmptySpeechLines {
                set: "insufficient_payment",
            });
        }
        if thank_you.is_empty() {
            return Err(TraderError::EmptySpeechLines { set: "thank_you" });
        }
        Ok(Self {
            no_stock,
            insufficient_payment,
            thank_you,
        })
    }

    /// All phrases available for `kind`.
    pub fn lines(&self, kind: SpeechKind) -> &[PhraseKey] {
        match kind {
            SpeechKind::NoStock => &self.no_stock,
            SpeechKind::InsufficientPayment => &self.insufficient_payment,
            SpeechKind::ThankYou => &self.thank_you,
        }
    }

    /// Draw one phrase for `kind` uniformly at random.
    ///
    /// Always `Some` for a table built through [`SpeechLines::new`].
    pub fn pick<R: Rng + ?Sized>(&self, kind: SpeechKind, rng: &mut R) -> Option<&PhraseKey> {
        let lines = self.lines(kind);
        if lines.is_empty() {
            return None;
        }
        lines.get(rng.random_range(0..lines.len()))
    }
}

impl Default for SpeechLines {
    fn default() -> Self {
        Self {
            no_stock: vec![PhraseKey::from("trader-out-of-stock")],
            insufficient_payment: vec![PhraseKey::from("trader-insufficient-payment")],
            thank_you: vec![
                PhraseKey::from("trader-thank-you"),
                PhraseKey::from("trader-come-again"),
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn keys(raw: &[&str]) -> Vec<PhraseKey> {
        raw.iter().map(|k| PhraseKey::from(*k)).collect()
    }

    #[test]
    fn empty_sets_are_rejected() {
        let err = SpeechLines::new(Vec::new(), keys(&["a"]), keys(&["b"])).unwrap_err();
        assert!(matches!(err, TraderError::EmptySpeechLines { set: "no_stock" }));

        let err = SpeechLines::new(keys(&["a"]), keys(&["b"]), Vec::new()).unwrap_err();
        assert!(matches!(err, TraderError::EmptySpeechLines { set: "thank_you" }));
    }

    #[test]
    fn picks_come_from_the_requested_set() {
        let lines = SpeechLines::new(keys(&["sold-out"]), keys(&["too-poor"]), keys(&["ta", "cheers"]))
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let picked = lines.pick(SpeechKind::ThankYou, &mut rng).unwrap();
            assert!(lines.lines(SpeechKind::ThankYou).contains(picked));
        }
        assert_eq!(
            lines.pick(SpeechKind::NoStock, &mut rng).map(PhraseKey::as_str),
            Some("sold-out")
        );
    }

    #[test]
    fn every_phrase_is_eventually_drawn() {
        let lines = SpeechLines::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            if let Some(key) = lines.pick(SpeechKind::ThankYou, &mut rng) {
                seen.insert(key.clone());
            }
        }
        assert_eq!(seen.len(), lines.lines(SpeechKind::ThankYou).len());
    }
}
