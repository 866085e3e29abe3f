// Tests for candidate ranking

use modsweep::cleaner::{rank, Candidate};
use std::path::PathBuf;

#[test]
fn test_equal_counts_keep_discovery_order() {
    let mut candidates = vec![
        Candidate::new(PathBuf::from("/first"), 2, 0),
        Candidate::new(PathBuf::from("/big"), 3, 2),
        Candidate::new(PathBuf::from("/second"), 0, 2),
        Candidate::new(PathBuf::from("/small"), 1, 0),
    ];

    rank(&mut candidates);

    let counts: Vec<_> = candidates.iter().map(|c| c.combined_dependencies()).collect();
    assert_eq!(counts, vec![5, 2, 2, 1]);
    assert_eq!(candidates[1].path, PathBuf::from("/first"));
    assert_eq!(candidates[2].path, PathBuf::from("/second"));
}

#[test]
fn test_many_ties_stay_in_order() {
    let mut candidates: Vec<_> = (0..50)
        .map(|i| Candidate::new(PathBuf::from(format!("/p{}", i)), i % 3, 0))
        .collect();

    rank(&mut candidates);

    for pair in candidates.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.combined_dependencies() >= b.combined_dependencies());
        if a.combined_dependencies() == b.combined_dependencies() {
            let index = |c: &Candidate| -> usize {
                c.path.to_str().unwrap()[2..].parse().unwrap()
            };
            assert!(index(a) < index(b));
        }
    }
}
