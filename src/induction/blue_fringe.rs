use itertools::Itertools;

use crate::{
    Result,
    automaton::{Alphabet, Letter, dfa::Dfa},
    config::BlueFringeConfig,
    induction::{build_pta, merge_groups, quotient, seed_union_find, union_find::UnionFind},
    logger::{LogLevel, Logger},
    sample::Sample,
};

/// BlueFringe induction: kernel/fringe state merging over the prefix tree
/// acceptor.
///
/// The kernel starts as the PTA root. Each step computes the fringe (the
/// leaders one symbol away from the kernel) and scores a trial merge of
/// every fringe candidate against every kernel state. A candidate compatible
/// with no kernel state is promoted into the kernel; otherwise the single
/// best-scoring pair of the whole sweep is committed before the fringe is
/// recomputed. The search ends when the fringe is empty.
#[derive(Debug, Default)]
pub struct BlueFringe<'a> {
    options: BlueFringeConfig,
    logger: Option<&'a Logger>,
}

impl<'a> BlueFringe<'a> {
    pub fn new(options: BlueFringeConfig) -> Self {
        BlueFringe {
            options,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: &'a Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Learns a DFA that classifies every string of `sample` correctly.
    /// Fails only if the sample itself is inconsistent.
    pub fn execute<L: Letter>(&self, sample: &Sample<L>) -> Result<Dfa<(), L>> {
        let pta = build_pta(sample)?;

        if let Some(l) = self.logger {
            l.object("BlueFringe")
                .add_field("sample size", &sample.len().to_string())
                .add_field("pta states", &pta.state_count().to_string())
                .log(LogLevel::Info);
        }

        let mut uf = seed_union_find(&pta);
        let mut kernel: Vec<usize> = vec![0];
        let mut steps = 0u64;

        loop {
            // committed merges can collapse kernel entries into each other
            kernel = kernel.iter().map(|&k| uf.find(k)).sorted().dedup().collect();

            let fringe = self.fringe(&uf, &kernel);
            if fringe.is_empty() {
                break;
            }

            steps += 1;
            if let Some(max) = self.options.max_steps {
                if steps > max {
                    // stop refining; the merges done so far already respect
                    // the sample, so promoting the rest is safe
                    if let Some(l) = self.logger {
                        l.warn(&format!("step limit {} reached, freezing fringe", max));
                    }
                    kernel.extend(fringe);
                    continue;
                }
            }

            if let Some(l) = self.logger {
                l.object("Step")
                    .add_field("step", &steps.to_string())
                    .add_field("kernel size", &kernel.len().to_string())
                    .add_field("fringe size", &fringe.len().to_string())
                    .log(LogLevel::Debug);
            }

            let mut best: Option<(usize, usize, usize)> = None;
            let mut promoted = false;

            for &candidate in &fringe {
                let mut compatible = false;

                for &target in &kernel {
                    uf.save_point();
                    let score = merge_groups(&mut uf, candidate, target);
                    uf.rollback();

                    if let Some(score) = score {
                        compatible = true;
                        if best.is_none_or(|(s, _, _)| score > s) {
                            best = Some((score, candidate, target));
                        }
                    }
                }

                if !compatible {
                    if let Some(l) = self.logger {
                        l.debug(&format!("promoted state {} into the kernel", candidate));
                    }
                    kernel.push(candidate);
                    promoted = true;
                    break;
                }
            }

            if promoted {
                continue;
            }

            let (score, candidate, target) =
                best.expect("an unpromoted fringe has a compatible pair");

            merge_groups(&mut uf, candidate, target)
                .expect("a merge that scored compatible stays compatible");

            if let Some(l) = self.logger {
                l.debug(&format!(
                    "merged state {} into {} with score {}",
                    candidate, target, score
                ));
            }
        }

        let learned = quotient(&uf, pta.alphabet().to_vec());

        if let Some(l) = self.logger {
            l.info(&format!(
                "learned a {}-state automaton from a {}-state pta in {} steps",
                learned.state_count(),
                pta.state_count(),
                steps
            ));
        }

        Ok(learned)
    }

    /// The leaders reachable by one symbol from the kernel, excluding the
    /// kernel itself, in id order.
    fn fringe<L: Letter>(
        &self,
        uf: &UnionFind<crate::induction::GroupData<L>>,
        kernel: &[usize],
    ) -> Vec<usize> {
        kernel
            .iter()
            .flat_map(|&k| uf.data(k).delta.values().map(|&target| uf.find(target)))
            .filter(|leader| !kernel.contains(leader))
            .sorted()
            .dedup()
            .collect()
    }
}
