//! Address-to-PIN reconciliation.
//!
//! Prefers exact-city precision when the PIN is in the reference table and
//! falls back to a coarse first-digit region check otherwise, so gross
//! misrouting is caught without false-flagging every PIN absent from the
//! exact table.

use std::collections::HashMap;
use std::sync::Arc;

use super::{PincodeDirectory, Region};

/// Checks extracted address text against the area implied by a PIN.
pub struct Reconciler {
    directory: Arc<dyn PincodeDirectory>,
    /// District aliases that count as a district match, keyed by the
    /// reference district name (e.g. Bengaluru for Bangalore).
    aliases: HashMap<String, Vec<String>>,
}

impl Reconciler {
    pub fn new(directory: Arc<dyn PincodeDirectory>) -> Self {
        Self {
            directory,
            aliases: default_aliases(),
        }
    }

    /// Reconcile an address against its declared PIN.
    ///
    /// Returns `None` when the address is consistent with the PIN; otherwise
    /// a human-readable mismatch warning. Callers must pass an exactly
    /// six-digit PIN; the extraction adapter guarantees this.
    pub fn reconcile(&self, address: &str, pin: &str) -> Option<String> {
        let addr = address.to_lowercase();

        if let Some(entry) = self.directory.lookup_exact(pin) {
            let state_match = addr.contains(&entry.state.to_lowercase());
            let district_match =
                addr.contains(&entry.district.to_lowercase()) || self.alias_match(&entry.district, &addr);
            if state_match && district_match {
                return None;
            }
            return Some(format!(
                "MISMATCH: PIN {} IS {}, {}",
                pin, entry.district, entry.state
            ));
        }

        let first_digit = match pin.chars().next() {
            Some(digit) => digit,
            None => return Some(format!("INVALID PIN PREFIX: {}", pin)),
        };

        match self.directory.lookup_fallback(first_digit) {
            Some(tokens) => {
                if tokens.iter().any(|t| addr.contains(&t.to_lowercase())) {
                    None
                } else {
                    let region = Region::from_first_digit(first_digit)
                        .map(|r| r.as_str())
                        .unwrap_or("UNKNOWN");
                    Some(format!("REGION MISMATCH: PIN {} IS {} INDIA", pin, region))
                }
            }
            None => Some(format!("INVALID PIN PREFIX: {}", pin)),
        }
    }

    fn alias_match(&self, district: &str, addr_lowercase: &str) -> bool {
        self.aliases
            .get(district)
            .map(|aliases| {
                aliases
                    .iter()
                    .any(|alias| addr_lowercase.contains(&alias.to_lowercase()))
            })
            .unwrap_or(false)
    }
}

/// Known district aliases. Only attested renames belong here.
fn default_aliases() -> HashMap<String, Vec<String>> {
    let mut aliases = HashMap::new();
    aliases.insert("Bangalore".to_string(), vec!["Bengaluru".to_string()]);
    aliases
}
