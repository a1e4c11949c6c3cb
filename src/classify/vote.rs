/// A crop only votes when its top class probability is strictly above this.
pub const VOTE_CONFIDENCE_THRESHOLD: f32 = 0.9;

/// The class a single prediction votes for, if it is confident enough.
///
/// Ties inside one probability vector go to the lowest index. A vector
/// containing NaN has no defined maximum and never votes.
pub fn vote(probabilities: &[f32]) -> Option<usize> {
    if probabilities.iter().any(|p| p.is_nan()) {
        return None;
    }
    let mut best: Option<(usize, f32)> = None;
    for (index, &p) in probabilities.iter().enumerate() {
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((index, p)),
        }
    }
    best.filter(|&(_, top)| top > VOTE_CONFIDENCE_THRESHOLD)
        .map(|(index, _)| index)
}

/// Fuse per-crop predictions into one class index.
///
/// Returns `None` when no crop is confident, or when two or more classes
/// share the highest vote count.
pub fn fuse_votes<P: AsRef<[f32]>>(predictions: &[P]) -> Option<usize> {
    let votes: Vec<usize> = predictions.iter().filter_map(|p| vote(p.as_ref())).collect();
    majority(&votes)
}

/// Unique mode of `votes`, or `None` if empty or tied.
pub fn majority(votes: &[usize]) -> Option<usize> {
    let max_class = *votes.iter().max()?;
    let mut counts = vec![0usize; max_class + 1];
    for &v in votes {
        counts[v] += 1;
    }
    let top = *counts.iter().max()?;
    let mut winners = counts.iter().enumerate().filter(|&(_, &c)| c == top);
    let (winner, _) = winners.next()?;
    if winners.next().is_some() {
        return None;
    }
    Some(winner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_wins() {
        assert_eq!(majority(&[0, 0, 1]), Some(0));
        assert_eq!(majority(&[2]), Some(2));
        assert_eq!(majority(&[1, 2, 2, 0, 2]), Some(2));
    }

    #[test]
    fn tie_at_mode_is_no_decision() {
        assert_eq!(majority(&[0, 1]), None);
        assert_eq!(majority(&[0, 0, 2, 2, 1]), None);
        assert_eq!(majority(&[]), None);
    }

    #[test]
    fn vote_requires_strict_confidence() {
        assert_eq!(vote(&[0.95, 0.03, 0.02]), Some(0));
        assert_eq!(vote(&[0.05, 0.05, 0.91]), Some(2));
        assert_eq!(vote(&[0.9, 0.05, 0.05]), None);
        assert_eq!(vote(&[0.5, 0.3, 0.2]), None);
        assert_eq!(vote(&[]), None);
    }

    #[test]
    fn nan_predictions_never_vote() {
        assert_eq!(vote(&[f32::NAN, 0.95, 0.0]), None);
        assert_eq!(vote(&[0.99, 0.0, f32::NAN]), None);
        assert_eq!(fuse_votes(&[vec![f32::NAN, 0.95, 0.0]]), None);

        // The NaN crop must not break the RED/YELLOW tie.
        let predictions = vec![
            vec![0.95, 0.03, 0.02],
            vec![0.02, 0.97, 0.01],
            vec![f32::NAN, 0.99, 0.0],
        ];
        assert_eq!(fuse_votes(&predictions), None);
    }

    #[test]
    fn low_confidence_crops_do_not_vote() {
        let predictions = vec![
            vec![0.95, 0.03, 0.02],
            vec![0.02, 0.97, 0.01],
            vec![0.10, 0.85, 0.05],
        ];
        // Only one confident RED and one confident YELLOW remain.
        assert_eq!(fuse_votes(&predictions), None);

        let predictions = vec![
            vec![0.95, 0.03, 0.02],
            vec![0.99, 0.00, 0.01],
            vec![0.02, 0.97, 0.01],
        ];
        assert_eq!(fuse_votes(&predictions), Some(0));
    }

    #[test]
    fn no_confident_prediction_is_no_decision() {
        let predictions = vec![[0.6f32, 0.3, 0.1], [0.2, 0.2, 0.6]];
        assert_eq!(fuse_votes(&predictions), None);
    }
}
