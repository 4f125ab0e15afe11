use anyhow::Result;
use shop_admin_core::core::schedule::{check_window, find_conflict};
use shop_admin_core::{has_conflict, validate_schedule, AdminError, OpeningWindow, ShopDraft};

fn window(day: u8, opens: &str, closes: &str) -> OpeningWindow {
    OpeningWindow::parse(day, opens, closes).expect("valid time literal")
}

#[test]
fn overlapping_windows_on_same_day_conflict() {
    let windows = vec![
        window(1, "09:00:00", "12:00:00"),
        window(1, "11:00:00", "14:00:00"),
    ];
    assert!(has_conflict(&windows));

    let report = validate_schedule(&windows);
    assert!(!report.valid);
    assert!(report.conflict_detected);
}

#[test]
fn same_hours_on_different_days_are_fine() {
    let windows = vec![
        window(1, "09:00:00", "12:00:00"),
        window(2, "09:00:00", "12:00:00"),
    ];
    assert!(!has_conflict(&windows));
    assert!(validate_schedule(&windows).valid);
}

#[test]
fn zero_length_window_rejected_as_malformed() {
    let windows = vec![window(3, "08:00:00", "08:00:00")];
    let report = validate_schedule(&windows);
    assert!(!report.valid);
    assert!(!report.conflict_detected);
    assert!(matches!(report.reason, Some(AdminError::MalformedWindow { .. })));
    assert!(check_window(0, &windows[0]).is_err());
}

#[test]
fn split_day_with_lunch_break() {
    let windows = vec![
        window(1, "09:00:00", "12:00:00"),
        window(1, "12:00:00", "18:00:00"),
        window(2, "09:00:00", "12:30:00"),
        window(2, "14:00:00", "19:00:00"),
        window(6, "10:00:00", "13:00:00"),
    ];
    assert!(!has_conflict(&windows));
    assert_eq!(find_conflict(&windows), None);
}

#[test]
fn shuffling_does_not_change_the_result() {
    let mut windows = vec![
        window(5, "13:00:00", "17:00:00"),
        window(4, "09:00:00", "12:00:00"),
        window(5, "09:00:00", "13:00:01"),
        window(7, "10:00:00", "12:00:00"),
    ];
    let expected = has_conflict(&windows);
    assert!(expected);

    for _ in 0..windows.len() {
        windows.rotate_left(1);
        assert_eq!(has_conflict(&windows), expected);
    }
    windows.reverse();
    assert_eq!(has_conflict(&windows), expected);
}

#[test]
fn shop_draft_from_json_reports_first_conflict() -> Result<()> {
    let draft: ShopDraft = serde_json::from_str(
        r#"{
            "id": 4,
            "name": "Librairie du Coin",
            "inVacations": false,
            "openingHours": [
                {"day": 2, "openAt": "09:00:00", "closeAt": "12:00:00"},
                {"day": 3, "openAt": "09:00:00", "closeAt": "18:00:00"},
                {"day": 3, "openAt": "17:30:00", "closeAt": "20:00:00"}
            ]
        }"#,
    )?;

    let err = validate_schedule(draft.opening_hours.windows())
        .into_result()
        .unwrap_err();
    match err {
        AdminError::ScheduleConflict { day, first, second } => {
            assert_eq!(day, 3);
            assert_eq!((first, second), (1, 2));
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
