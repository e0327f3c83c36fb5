//! Drawdown analysis on the compounding wealth walk.
//!
//! Wealth starts at 1.0 before the first return and the running peak starts
//! there too, so a series that opens with a loss is already in drawdown at
//! index 0. Durations are counted in index positions, not calendar days.
//!
//! Two duration notions are reported and they answer different questions:
//! [`duration_of_max_drawdown`] follows the deepest trough back to its peak
//! and forward to recovery, while [`longest_drawdown`] finds the episode that
//! stayed under water longest regardless of depth.

/// Wealth after each return, starting from 1.0.
pub fn wealth_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

/// Most negative `wealth / running_peak - 1`, or 0 if wealth never falls.
///
/// # Examples
///
/// ```
/// use tearsheet_metrics::drawdown::max_drawdown;
///
/// let mdd = max_drawdown(&[0.10, -0.10]);
/// assert!((mdd - -0.10).abs() < 1e-12);
/// ```
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;
    for wealth in wealth_curve(returns) {
        peak = peak.max(wealth);
        worst = worst.min(wealth / peak - 1.0);
    }
    worst
}

/// Index span of the maximum-drawdown episode.
///
/// Measured from the peak preceding the deepest trough to the first later
/// index whose wealth regains that peak, or to the last index when it never
/// does. The first occurrence of the deepest trough wins. 0 without a
/// drawdown.
pub fn duration_of_max_drawdown(returns: &[f64]) -> usize {
    let wealth = wealth_curve(returns);

    let mut peak = 1.0_f64;
    let mut peak_index = 0;
    let mut worst = 0.0_f64;
    let mut deepest: Option<(usize, f64, usize)> = None;

    for (i, w) in wealth.iter().enumerate() {
        if *w > peak {
            peak = *w;
            peak_index = i;
        }
        let dd = w / peak - 1.0;
        if dd < worst {
            worst = dd;
            deepest = Some((peak_index, peak, i));
        }
    }

    let Some((start, peak_value, trough)) = deepest else {
        return 0;
    };
    let end = wealth[trough + 1..]
        .iter()
        .position(|w| *w >= peak_value)
        .map_or(wealth.len() - 1, |offset| trough + 1 + offset);
    end - start
}

/// A stretch of time spent below a prior peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownEpisode {
    /// Index of the peak the episode is measured from
    pub peak_index: usize,
    /// Index of the new peak that closed it, or the last index if still open
    pub end_index: usize,
    /// `min_wealth / peak_wealth - 1` within the episode
    pub depth: f64,
    /// Whether a new peak closed the episode
    pub recovered: bool,
}

impl DrawdownEpisode {
    /// Length of the episode in index positions.
    pub const fn duration(&self) -> usize {
        self.end_index - self.peak_index
    }
}

/// Every drawdown episode in chronological order.
///
/// An episode opens when wealth drops below the running peak and closes at
/// the first index that sets a strictly higher peak.
pub fn drawdown_episodes(returns: &[f64]) -> Vec<DrawdownEpisode> {
    let wealth = wealth_curve(returns);
    let mut episodes = Vec::new();

    let mut peak = 1.0_f64;
    let mut peak_index = 0;
    // (peak index, peak wealth, minimum wealth so far)
    let mut open: Option<(usize, f64, f64)> = None;

    for (i, w) in wealth.iter().copied().enumerate() {
        if w > peak {
            if let Some((start, start_peak, low)) = open.take() {
                episodes.push(DrawdownEpisode {
                    peak_index: start,
                    end_index: i,
                    depth: low / start_peak - 1.0,
                    recovered: true,
                });
            }
            peak = w;
            peak_index = i;
        } else if w < peak {
            open = match open {
                Some((start, start_peak, low)) => Some((start, start_peak, low.min(w))),
                None => Some((peak_index, peak, w)),
            };
        }
    }

    if let Some((start, start_peak, low)) = open {
        episodes.push(DrawdownEpisode {
            peak_index: start,
            end_index: wealth.len() - 1,
            depth: low / start_peak - 1.0,
            recovered: false,
        });
    }
    episodes
}

/// The episode with the longest duration; ties keep the earliest.
pub fn longest_drawdown(returns: &[f64]) -> Option<DrawdownEpisode> {
    drawdown_episodes(returns)
        .into_iter()
        .fold(None, |best: Option<DrawdownEpisode>, episode| match best {
            Some(b) if b.duration() >= episode.duration() => Some(b),
            _ => Some(episode),
        })
}
