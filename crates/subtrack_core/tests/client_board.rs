use serde_json::Value;
use std::cell::{Cell, RefCell};
use subtrack_core::{
    format_timestamp, new_subscription_from_json, parse_date, patch_from_json, ClientError,
    ClientResult, CostLevel, Subscription, SubscriptionApi, SubscriptionBoard, SubscriptionId,
};

#[derive(Default)]
struct FakeApi {
    rows: RefCell<Vec<Subscription>>,
    next_id: Cell<SubscriptionId>,
    calls: RefCell<Vec<String>>,
    fail_list: Cell<bool>,
}

impl FakeApi {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn reject(message: impl ToString) -> ClientError {
        ClientError::Api {
            status: 400,
            message: message.to_string(),
        }
    }
}

impl SubscriptionApi for FakeApi {
    fn list(&self) -> ClientResult<Vec<Subscription>> {
        self.calls.borrow_mut().push("list".to_string());
        if self.fail_list.get() {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        let mut rows = self.rows.borrow().clone();
        rows.reverse();
        Ok(rows)
    }

    fn create(&self, body: &Value) -> ClientResult<Subscription> {
        self.calls.borrow_mut().push("create".to_string());
        let input = new_subscription_from_json(body).map_err(FakeApi::reject)?;
        self.next_id.set(self.next_id.get() + 1);
        let row = Subscription {
            id: self.next_id.get(),
            name: input.name,
            price: input.price,
            cycle: input.cycle,
            start_date: input.start_date,
            active: true,
            created_at: parse_date("2024-01-01").unwrap(),
        };
        self.rows.borrow_mut().push(row.clone());
        Ok(row)
    }

    fn update(&self, id: SubscriptionId, body: &Value) -> ClientResult<Subscription> {
        self.calls.borrow_mut().push(format!("update:{id}"));
        let patch = patch_from_json(body).map_err(FakeApi::reject)?;
        let mut rows = self.rows.borrow_mut();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| FakeApi::reject("not found"))?;
        patch.apply_to(row);
        Ok(row.clone())
    }

    fn delete(&self, id: SubscriptionId) -> ClientResult<Subscription> {
        self.calls.borrow_mut().push(format!("delete:{id}"));
        let mut rows = self.rows.borrow_mut();
        let index = rows
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| FakeApi::reject("not found"))?;
        Ok(rows.remove(index))
    }
}

fn fill_draft(board: &mut SubscriptionBoard<FakeApi>, name: &str, price: &str, cycle: &str) {
    let draft = board.draft_mut();
    draft.name = name.to_string();
    draft.price = price.to_string();
    draft.cycle = cycle.to_string();
    draft.start_date = "2023-01-01".to_string();
}

#[test]
fn submit_creates_then_refetches_and_resets_draft() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    fill_draft(&mut board, "Netflix", "15.99", "monthly");

    let created = board.submit().unwrap();

    assert_eq!(created.name, "Netflix");
    assert_eq!(board.api().calls(), vec!["create", "list"]);
    assert_eq!(board.subscriptions().len(), 1);
    assert_eq!(board.draft().name, "");
    assert_eq!(board.draft().cycle, "monthly");
    assert_eq!(board.editing(), None);
}

#[test]
fn editing_switches_submit_to_update() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    fill_draft(&mut board, "Netflix", "15.99", "monthly");
    let created = board.submit().unwrap();

    assert!(board.begin_edit(created.id));
    assert_eq!(board.editing(), Some(created.id));
    assert_eq!(board.draft().name, "Netflix");
    assert_eq!(board.draft().price, "15.99");
    assert_eq!(board.draft().start_date, "2023-01-01");

    board.draft_mut().price = "17.99".to_string();
    let updated = board.submit().unwrap();

    assert_eq!(updated.price, 17.99);
    assert_eq!(
        board.api().calls(),
        vec![
            "create".to_string(),
            "list".to_string(),
            format!("update:{}", created.id),
            "list".to_string(),
        ]
    );
    assert_eq!(board.editing(), None);
    assert_eq!(board.subscriptions()[0].price, 17.99);
    assert_eq!(
        format_timestamp(&board.subscriptions()[0].start_date),
        "2023-01-01T00:00:00.000Z"
    );
}

#[test]
fn begin_edit_ignores_unknown_rows() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    assert!(!board.begin_edit(42));
    assert_eq!(board.editing(), None);
}

#[test]
fn remove_refetches_and_clears_matching_edit() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    fill_draft(&mut board, "Netflix", "15.99", "monthly");
    let created = board.submit().unwrap();
    board.begin_edit(created.id);

    let deleted = board.remove(created.id).unwrap();

    assert_eq!(deleted.id, created.id);
    assert!(board.subscriptions().is_empty());
    assert_eq!(board.editing(), None);
    assert_eq!(board.api().calls().last().map(String::as_str), Some("list"));
}

#[test]
fn server_message_is_surfaced_and_list_is_not_refetched() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    fill_draft(&mut board, "Free", "0", "monthly");

    let err = board.submit().unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 400, .. }));
    assert_eq!(
        board.last_error(),
        Some("missing required fields: name, price, cycle, startDate")
    );
    assert_eq!(board.api().calls(), vec!["create"]);
    assert_eq!(board.draft().name, "Free");
}

#[test]
fn transport_failure_uses_generic_message() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    board.api().fail_list.set(true);

    assert!(board.refresh().is_err());
    assert_eq!(board.last_error(), Some("request failed"));
}

#[test]
fn total_follows_latest_fetched_list() {
    let mut board = SubscriptionBoard::new(FakeApi::default());
    fill_draft(&mut board, "Domain", "12", "yearly");
    board.submit().unwrap();
    fill_draft(&mut board, "Music", "10", "monthly");
    board.submit().unwrap();

    assert!((board.monthly_total() - 11.0).abs() < 1e-9);
    assert_eq!(board.cost_level(), CostLevel::Normal);

    fill_draft(&mut board, "Cloud", "95", "weekly");
    board.submit().unwrap();
    assert!((board.monthly_total() - 106.0).abs() < 1e-9);
    assert_eq!(board.cost_level(), CostLevel::High);
}
