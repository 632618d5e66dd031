use crate::{
    Result,
    automaton::{Alphabet, Letter, dfa::Dfa},
    induction::{build_pta, merge_groups, quotient, seed_union_find},
    logger::Logger,
};

/// Regular positive and negative induction: greedy leftmost state merging
/// over the prefix tree acceptor.
///
/// States are visited in index order; each is merged with the lowest-indexed
/// compatible leader before it, or stays a singleton group if none is
/// compatible. Every trial merge runs inside a union-find transaction and is
/// rolled back on incompatibility.
#[derive(Debug, Default)]
pub struct Rpni<'a> {
    logger: Option<&'a Logger>,
}

impl<'a> Rpni<'a> {
    pub fn new() -> Self {
        Rpni { logger: None }
    }

    pub fn with_logger(mut self, logger: &'a Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Learns a DFA that classifies every string of `sample` correctly.
    /// Fails only if the sample itself is inconsistent.
    pub fn execute<L: Letter>(&self, sample: &crate::sample::Sample<L>) -> Result<Dfa<(), L>> {
        let pta = build_pta(sample)?;

        if let Some(l) = self.logger {
            l.object("RPNI")
                .add_field("sample size", &sample.len().to_string())
                .add_field("pta states", &pta.state_count().to_string())
                .log(crate::logger::LogLevel::Info);
        }

        let mut uf = seed_union_find(&pta);

        for candidate in 1..uf.len() {
            if !uf.is_leader(candidate) {
                continue;
            }

            for target in 0..candidate {
                if !uf.is_leader(target) {
                    continue;
                }

                uf.save_point();

                if merge_groups(&mut uf, candidate, target).is_some() {
                    uf.commit();

                    if let Some(l) = self.logger {
                        l.debug(&format!("merged state {} into {}", candidate, target));
                    }

                    break;
                }

                uf.rollback();
            }
        }

        let learned = quotient(&uf, pta.alphabet().to_vec());

        if let Some(l) = self.logger {
            l.info(&format!(
                "learned a {}-state automaton from a {}-state pta",
                learned.state_count(),
                pta.state_count()
            ));
        }

        Ok(learned)
    }
}
