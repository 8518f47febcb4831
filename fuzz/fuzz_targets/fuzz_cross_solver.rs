#![no_main]

use libfuzzer_sys::fuzz_target;

use num_bigint::BigInt;
use seqcalc_core::companion::CompanionMatrix;
use seqcalc_core::ctl::ComputeCtl;
use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::fastdoubling::FastDoubling;
use seqcalc_core::solver::StateSolver;
use seqcalc_core::stepper::LinearUnroll;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    // Bytes 0-1: offset, capped for speed. Bytes 2-5: coefficients and
    // seeds as small signed values (negatives included).
    let offset = u64::from(u16::from_le_bytes([data[0], data[1]])) % 2_000;
    let p = i64::from(data[2] as i8);
    let q = i64::from(data[3] as i8);
    let a0 = i64::from(data[4] as i8);
    let a1 = i64::from(data[5] as i8);

    let def = RecurrenceDefinition::new(
        vec![BigInt::from(a0), BigInt::from(a1)],
        vec![BigInt::from(p), BigInt::from(q)],
        0,
    )
    .expect("order-2 definition is well-formed");

    let ctl = ComputeCtl::unbounded();
    let oracle = LinearUnroll::new().state_at(&def, offset, &ctl);
    let doubling = FastDoubling::new().state_at(&def, offset, &ctl);
    let companion = CompanionMatrix::new().state_at(&def, offset, &ctl);

    match (oracle, doubling, companion) {
        (Ok(o), Ok(d), Ok(c)) => {
            assert_eq!(o, d, "doubling != oracle at offset={offset} p={p} q={q}");
            assert_eq!(o, c, "companion != oracle at offset={offset} p={p} q={q}");
        }
        _ => {} // No control is set, so all three should succeed.
    }
});
