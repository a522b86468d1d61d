//! Random proxy selection

use rand::seq::IndexedRandom;

/// Picks one candidate uniformly at random, or `None` for an empty list
pub fn choose<T>(candidates: &[T]) -> Option<&T> {
    candidates.choose(&mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_yields_none() {
        let empty: [String; 0] = [];
        assert!(choose(&empty).is_none());
    }

    #[test]
    fn test_single_candidate_always_chosen() {
        let proxies = ["http://10.0.0.1:3128"];
        for _ in 0..10 {
            assert_eq!(choose(&proxies), Some(&"http://10.0.0.1:3128"));
        }
    }

    #[test]
    fn test_choice_is_a_member() {
        let proxies = ["a", "b", "c"];
        for _ in 0..50 {
            let picked = choose(&proxies).unwrap();
            assert!(proxies.contains(picked));
        }
    }
}
