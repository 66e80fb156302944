use chrono::{Duration, NaiveDate, Utc};
use common::PriceBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a random-walk daily series ending today
pub fn generate_synthetic_bars(days: usize, initial_price: f64) -> Vec<PriceBar> {
    let start_date = Utc::now().date_naive() - Duration::days(days as i64);
    generate_synthetic_bars_from(days, initial_price, start_date)
}

/// Random-walk daily series starting at `start_date`
pub fn generate_synthetic_bars_from(
    days: usize,
    initial_price: f64,
    start_date: NaiveDate,
) -> Vec<PriceBar> {
    generate_bars(&mut StdRng::from_entropy(), days, initial_price, start_date)
}

/// Same as `generate_synthetic_bars` but reproducible from `seed`
pub fn generate_seeded_bars(
    days: usize,
    initial_price: f64,
    start_date: NaiveDate,
    seed: u64,
) -> Vec<PriceBar> {
    generate_bars(&mut StdRng::seed_from_u64(seed), days, initial_price, start_date)
}

fn generate_bars<R: Rng>(
    rng: &mut R,
    days: usize,
    initial_price: f64,
    start_date: NaiveDate,
) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(days);
    let mut price = initial_price;

    // ETF-like parameters
    let daily_volatility = 0.015;
    let drift = 0.0002;

    for i in 0..days {
        let date = start_date + Duration::days(i as i64);

        let random_return: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = drift + daily_volatility * random_return;
        let new_price = price * (1.0 + daily_return);

        // Generate OHLC
        let intraday_range = price * rng.gen_range(0.005..0.025);
        let open = price + rng.gen_range(-intraday_range / 2.0..intraday_range / 2.0);
        let close = new_price;

        let high = open.max(close) + rng.gen_range(0.0..intraday_range / 2.0);
        let low = open.min(close) - rng.gen_range(0.0..intraday_range / 2.0);

        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
        });

        price = new_price;
    }

    bars
}

/// Series that trends down for `down_days` then jumps and trends up
pub fn generate_reversal_bars(
    down_days: usize,
    up_days: usize,
    initial_price: f64,
    start_date: NaiveDate,
) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(down_days + up_days);
    let mut price = initial_price;

    for i in 0..(down_days + up_days) {
        let daily_return = if i < down_days { -0.02 } else { 0.02 };
        let new_price = price * (1.0 + daily_return);
        let range = price * 0.005;

        bars.push(PriceBar {
            date: start_date + Duration::days(i as i64),
            open: price,
            high: price.max(new_price) + range,
            low: price.min(new_price) - range,
            close: new_price,
        });

        price = new_price;
    }

    bars
}
