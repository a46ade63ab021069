// tests/parsing_properties.rs

use proptest::prelude::*;

use gridpoll::status::{
    AccountingUsageLine, CanonicalStatus, canonicalize, parse_duration_secs, qacct_job_state,
    qstat_job_state,
};

const KNOWN: &[&str] = &[
    "r", "x", "t", "s", "R", "qw", "d", "E", "FAIL", "EXIT_STATUS: 1", "SUCCESS", "EXIT_STATUS: 0",
];

proptest! {
    #[test]
    fn unknown_tokens_never_map(token in "\\PC{0,16}") {
        prop_assume!(!KNOWN.contains(&token.as_str()));
        prop_assert_eq!(canonicalize(&token), None);
    }

    #[test]
    fn duration_components_add_up(d in 0u64..100, h in 0u64..24, m in 0u64..60, s in 0u64..60) {
        let text = format!("{d}:{h:02}:{m:02}:{s:02}");
        prop_assert_eq!(parse_duration_secs(&text), Some(((d * 24 + h) * 60 + m) * 60 + s));

        let short = format!("{h:02}:{m:02}:{s:02}");
        prop_assert_eq!(parse_duration_secs(&short), Some((h * 60 + m) * 60 + s));
    }

    #[test]
    fn usage_fields_parse_in_any_order(w in 0u64..86_400, c in 0u64..86_400, cpu_first in any::<bool>()) {
        let fmt = |secs: u64| format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
        let fields = if cpu_first {
            format!("cpu={}, mem=1.5 GBs, wallclock={}", fmt(c), fmt(w))
        } else {
            format!("wallclock={}, cpu={}, io=0.001", fmt(w), fmt(c))
        };
        let usage = AccountingUsageLine::parse(&format!("usage    1:   {fields}"));
        prop_assert_eq!(usage.wallclock_secs, w);
        prop_assert_eq!(usage.cpu_secs, c);
    }

    #[test]
    fn qstat_state_survives_column_padding(pad in 1usize..40, idx in 0usize..6) {
        let state = ["r", "x", "t", "s", "R", "qw"][idx];
        let out = format!("job_number: 9\njob_state{}{state}\n", " ".repeat(pad));
        prop_assert_eq!(qstat_job_state(&out), state);
        prop_assert_eq!(canonicalize(qstat_job_state(&out)), Some(CanonicalStatus::Running));
    }

    #[test]
    fn qacct_success_needs_both_zero(failed in 0u8..10, exit in 0u8..10) {
        let out = format!("failed       {failed}\nexit_status  {exit}\n");
        let expected = if failed == 0 && exit == 0 { "SUCCESS" } else { "FAIL" };
        prop_assert_eq!(qacct_job_state(&out), expected);
    }
}
