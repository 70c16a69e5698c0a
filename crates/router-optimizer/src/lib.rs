//! Greedy route optimization across liquidity venues.
//!
//! The optimizer splits an input amount into equal discrete steps and
//! assigns each step to the venue currently offering the best marginal
//! output. Under the assumption that every venue's marginal output per
//! additional step is non-increasing (price impact), the greedy choice
//! reaches the discretized optimum.
//!
//! Quoting cost is kept at `O(N)` initial quotes plus one re-quote per
//! step: after a venue wins a step, only that venue's next marginal price
//! is refreshed. A non-selected venue whose curve depends on state moved
//! by another venue's simulated trade would not be picked up by this
//! scheme; the deployed on-chain optimiser shares the same approximation.

use alloy_primitives::U256;
use futures::future::try_join_all;
use router_types::{SwapDirection, SwapRoute};
use router_venues::{VenueError, VenueInterface};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by route optimization.
#[derive(Debug, Error)]
pub enum OptimizerError {
	/// The venue set is empty; there is nothing to allocate across.
	#[error("no venues available")]
	NoVenuesAvailable,
	/// A zero step count cannot produce a route.
	#[error("invalid step count: {0}")]
	InvalidStepCount(u32),
	/// A venue failed to quote. Propagated unmodified, no retry.
	#[error(transparent)]
	Venue(#[from] VenueError),
}

/// Greedy marginal allocator over a fixed, ordered venue set.
///
/// Venue order is significant: a route's portion at index `i` belongs to
/// the venue registered at index `i`, and ties in marginal gain resolve to
/// the lowest index.
pub struct RouteOptimizer {
	venues: Vec<Arc<dyn VenueInterface>>,
}

impl RouteOptimizer {
	pub fn new(venues: Vec<Arc<dyn VenueInterface>>) -> Self {
		Self { venues }
	}

	pub fn venues(&self) -> &[Arc<dyn VenueInterface>] {
		&self.venues
	}

	/// Computes the allocation of `amount_in` across the venue set that
	/// maximizes expected output at the given discretization granularity.
	///
	/// The returned route's `min_amount_out` equals its `amount_out`;
	/// callers relax it before execution. Failure yields no route and has
	/// no side effects.
	pub async fn optimize(
		&self,
		direction: SwapDirection,
		amount_in: U256,
		steps: u32,
	) -> Result<SwapRoute, OptimizerError> {
		if self.venues.is_empty() {
			return Err(OptimizerError::NoVenuesAvailable);
		}
		if steps == 0 {
			return Err(OptimizerError::InvalidStepCount(steps));
		}

		// Integer division: any remainder stays out of the optimization.
		// The execution contract still receives the full amount_in.
		let amount_per_step = amount_in / U256::from(steps);

		// Quote the first step on every venue concurrently. try_join_all
		// collects results in venue order, so index alignment holds.
		let initial = try_join_all(
			self.venues
				.iter()
				.map(|venue| venue.quote(direction, amount_per_step)),
		)
		.await?;

		let mut last_prices = initial.clone();
		let mut gains = initial;
		let mut portions = vec![0u64; self.venues.len()];
		let mut amount_out = U256::ZERO;

		for step in 1..=steps {
			// Strict comparison scanning from index 0: ties go to the
			// lowest-indexed venue.
			let mut best = 0;
			for (index, gain) in gains.iter().enumerate().skip(1) {
				if *gain > gains[best] {
					best = index;
				}
			}

			amount_out += gains[best];
			portions[best] += 1;

			if step == steps {
				break;
			}

			// Refresh only the chosen venue's marginal price at its new
			// cumulative allocation. A venue quoted past its depth can
			// price the larger amount below the previous cumulative quote;
			// the gain clamps to zero instead of underflowing.
			let next_amount = amount_per_step * U256::from(portions[best] + 1);
			let next_price = self.venues[best].quote(direction, next_amount).await?;
			gains[best] = next_price.saturating_sub(last_prices[best]);
			last_prices[best] = next_price;
		}

		debug!(
			%direction,
			%amount_in,
			steps,
			?portions,
			%amount_out,
			"optimized route"
		);

		Ok(SwapRoute {
			direction,
			portions,
			amount_in,
			amount_out,
			min_amount_out: amount_out,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Venue driven by a fixed cumulative quote schedule: quoting
	/// `k * step_size` returns the k-th cumulative output.
	struct ScheduleVenue {
		step_size: U256,
		cumulative: Vec<u64>,
		calls: AtomicUsize,
	}

	impl ScheduleVenue {
		/// Builds the cumulative schedule from per-step marginal outputs.
		fn from_marginals(step_size: u64, marginals: &[u64]) -> Self {
			let mut cumulative = Vec::with_capacity(marginals.len());
			let mut total = 0;
			for marginal in marginals {
				total += marginal;
				cumulative.push(total);
			}
			Self {
				step_size: U256::from(step_size),
				cumulative,
				calls: AtomicUsize::new(0),
			}
		}

		fn call_count(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}

	#[async_trait]
	impl VenueInterface for ScheduleVenue {
		fn name(&self) -> &str {
			"schedule"
		}

		async fn quote(
			&self,
			_direction: SwapDirection,
			amount_in: U256,
		) -> Result<U256, VenueError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			let k = (amount_in / self.step_size).to::<u64>() as usize;
			assert!(k >= 1, "optimizer quoted below one step");
			let index = k.min(self.cumulative.len()) - 1;
			Ok(U256::from(self.cumulative[index]))
		}
	}

	/// Constant-product venue: out = reserve_out * in / (reserve_in + in).
	/// Monotone increasing and concave in the input amount.
	struct AmmVenue {
		reserve_in: U256,
		reserve_out: U256,
	}

	impl AmmVenue {
		fn new(reserve_in: u64, reserve_out: u64) -> Self {
			Self {
				reserve_in: U256::from(reserve_in),
				reserve_out: U256::from(reserve_out),
			}
		}

		fn spot(&self, amount_in: U256) -> U256 {
			self.reserve_out * amount_in / (self.reserve_in + amount_in)
		}
	}

	#[async_trait]
	impl VenueInterface for AmmVenue {
		fn name(&self) -> &str {
			"amm"
		}

		async fn quote(
			&self,
			_direction: SwapDirection,
			amount_in: U256,
		) -> Result<U256, VenueError> {
			Ok(self.spot(amount_in))
		}
	}

	struct FailingVenue;

	#[async_trait]
	impl VenueInterface for FailingVenue {
		fn name(&self) -> &str {
			"failing"
		}

		async fn quote(
			&self,
			_direction: SwapDirection,
			_amount_in: U256,
		) -> Result<U256, VenueError> {
			Err(VenueError::QuoteUnavailable("pool not found".to_string()))
		}
	}

	fn optimizer(venues: Vec<Arc<dyn VenueInterface>>) -> RouteOptimizer {
		RouteOptimizer::new(venues)
	}

	#[tokio::test]
	async fn allocates_greedily_across_schedules() {
		// Venue 0 yields a flat 9 per step, venue 1 starts at 10 and
		// decays by 1 each step. Venue 1 wins the first step; every tie
		// afterwards goes to venue 0.
		let flat = Arc::new(ScheduleVenue::from_marginals(10, &[9; 10]));
		let decaying = Arc::new(ScheduleVenue::from_marginals(
			10,
			&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
		));

		let route = optimizer(vec![flat, decaying])
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await
			.unwrap();

		assert_eq!(route.portions, vec![9, 1]);
		assert_eq!(route.amount_out, U256::from(91u64));
		assert_eq!(route.amount_in, U256::from(100u64));
	}

	#[tokio::test]
	async fn ties_resolve_to_the_lowest_index() {
		let first = Arc::new(ScheduleVenue::from_marginals(10, &[5; 10]));
		let second = Arc::new(ScheduleVenue::from_marginals(10, &[5; 10]));

		let route = optimizer(vec![first, second])
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await
			.unwrap();

		assert_eq!(route.portions, vec![10, 0]);
		assert_eq!(route.amount_out, U256::from(50u64));
	}

	#[tokio::test]
	async fn portions_sum_to_the_step_count() {
		let venues: Vec<Arc<dyn VenueInterface>> = vec![
			Arc::new(ScheduleVenue::from_marginals(5, &[8, 6, 4, 2, 1, 1, 1, 1, 1, 1, 1, 1])),
			Arc::new(ScheduleVenue::from_marginals(5, &[7, 7, 3, 3, 1, 1, 1, 1, 1, 1, 1, 1])),
			Arc::new(ScheduleVenue::from_marginals(5, &[5, 5, 5, 5, 5, 1, 1, 1, 1, 1, 1, 1])),
		];

		let route = optimizer(venues)
			.optimize(SwapDirection::ToEth, U256::from(60u64), 12)
			.await
			.unwrap();

		assert_eq!(route.portions.len(), 3);
		assert_eq!(route.portions.iter().sum::<u64>(), 12);
	}

	#[tokio::test]
	async fn output_is_monotonic_in_amount_in() {
		let venues = || -> Vec<Arc<dyn VenueInterface>> {
			vec![
				Arc::new(AmmVenue::new(10_000, 9_000)),
				Arc::new(AmmVenue::new(50_000, 48_000)),
			]
		};

		let small = optimizer(venues())
			.optimize(SwapDirection::ToLst, U256::from(1_000u64), 10)
			.await
			.unwrap();
		let large = optimizer(venues())
			.optimize(SwapDirection::ToLst, U256::from(2_000u64), 10)
			.await
			.unwrap();

		assert!(large.amount_out >= small.amount_out);
	}

	#[tokio::test]
	async fn beats_any_single_venue_allocation() {
		let shallow = AmmVenue::new(10_000, 9_500);
		let deep = AmmVenue::new(80_000, 76_000);
		let amount = U256::from(5_000u64);

		// Allocating every step to one venue telescopes to its cumulative
		// quote at the full amount.
		let all_shallow = shallow.spot(amount);
		let all_deep = deep.spot(amount);

		let route = optimizer(vec![Arc::new(shallow), Arc::new(deep)])
			.optimize(SwapDirection::ToLst, amount, 10)
			.await
			.unwrap();

		assert!(route.amount_out >= all_shallow);
		assert!(route.amount_out >= all_deep);
	}

	#[tokio::test]
	async fn min_amount_out_defaults_to_amount_out() {
		let venue = Arc::new(ScheduleVenue::from_marginals(10, &[4; 10]));

		let route = optimizer(vec![venue])
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await
			.unwrap();

		assert_eq!(route.min_amount_out, route.amount_out);
	}

	#[tokio::test]
	async fn division_remainder_is_dropped() {
		let venues = || -> Vec<Arc<dyn VenueInterface>> {
			vec![Arc::new(ScheduleVenue::from_marginals(10, &[6; 10]))]
		};

		let even = optimizer(venues())
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await
			.unwrap();
		let uneven = optimizer(venues())
			.optimize(SwapDirection::ToLst, U256::from(105u64), 10)
			.await
			.unwrap();

		// The 5 wei of dust does not change the allocation or the output.
		assert_eq!(uneven.portions, even.portions);
		assert_eq!(uneven.amount_out, even.amount_out);
		assert_eq!(uneven.amount_in, U256::from(105u64));
	}

	#[tokio::test]
	async fn zero_steps_is_rejected() {
		let venue = Arc::new(ScheduleVenue::from_marginals(10, &[4; 10]));

		let result = optimizer(vec![venue])
			.optimize(SwapDirection::ToLst, U256::from(100u64), 0)
			.await;

		assert!(matches!(result, Err(OptimizerError::InvalidStepCount(0))));
	}

	#[tokio::test]
	async fn empty_venue_set_is_rejected() {
		let result = optimizer(vec![])
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await;

		assert!(matches!(result, Err(OptimizerError::NoVenuesAvailable)));
	}

	#[tokio::test]
	async fn venue_failures_propagate_unmodified() {
		let venues: Vec<Arc<dyn VenueInterface>> = vec![
			Arc::new(ScheduleVenue::from_marginals(10, &[4; 10])),
			Arc::new(FailingVenue),
		];

		let result = optimizer(venues)
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await;

		assert!(matches!(
			result,
			Err(OptimizerError::Venue(VenueError::QuoteUnavailable(_)))
		));
	}

	#[tokio::test]
	async fn requotes_only_the_chosen_venue() {
		let flat = Arc::new(ScheduleVenue::from_marginals(10, &[9; 10]));
		let decaying = Arc::new(ScheduleVenue::from_marginals(
			10,
			&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
		));
		let venues: Vec<Arc<dyn VenueInterface>> = vec![flat.clone(), decaying.clone()];

		optimizer(venues)
			.optimize(SwapDirection::ToLst, U256::from(100u64), 10)
			.await
			.unwrap();

		// One initial quote per venue plus one re-quote per step except
		// the last: N + S - 1 total.
		assert_eq!(flat.call_count() + decaying.call_count(), 2 + 10 - 1);
	}
}
