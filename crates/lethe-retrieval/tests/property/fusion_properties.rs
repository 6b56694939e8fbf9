use std::collections::{HashMap, HashSet};

use lethe_core::{Candidate, EngineKind, EngineOutput};
use lethe_retrieval::fusion::fuse_basic;
use proptest::prelude::*;

fn arb_list(engine: EngineKind) -> impl Strategy<Value = EngineOutput> {
    prop::collection::vec(("[A-F]", 0.0f64..1.0), 0..8).prop_map(move |items| {
        let mut candidates: Vec<Candidate> = items
            .into_iter()
            .map(|(id, score)| Candidate::new(id, score))
            .collect();
        candidates.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score));
        EngineOutput::new(engine, candidates)
    })
}

proptest! {
    #[test]
    fn fused_output_is_bounded_unique_and_sorted(
        a in arb_list(EngineKind::Lexical),
        b in arb_list(EngineKind::Similarity),
        top_k in 0usize..10,
    ) {
        let lists = [a, b];
        let fused = fuse_basic(&lists, top_k);

        prop_assert!(fused.len() <= top_k);
        let unique: HashSet<&str> = fused.iter().map(|c| c.candidate_id.as_str()).collect();
        prop_assert_eq!(unique.len(), fused.len());
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn fused_score_is_the_best_occurrence(
        a in arb_list(EngineKind::Lexical),
        b in arb_list(EngineKind::Forgetting),
    ) {
        let lists = [a, b];
        let mut best: HashMap<&str, f64> = HashMap::new();
        for c in lists.iter().flat_map(|l| &l.candidates) {
            let slot = best.entry(c.candidate_id.as_str()).or_insert(f64::MIN);
            *slot = slot.max(c.raw_score);
        }

        let fused = fuse_basic(&lists, usize::MAX);
        prop_assert_eq!(fused.len(), best.len());
        for c in &fused {
            prop_assert_eq!(c.score, best[c.candidate_id.as_str()]);
        }
    }
}
