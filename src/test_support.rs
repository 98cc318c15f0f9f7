//! In-memory repository used by service and handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use tokio::sync::oneshot;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, InvoiceForm, ListResult, NewInvoice};
use crate::domain::ports::InvoiceRepository;

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    rows: Mutex<Vec<Invoice>>,
    calls: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl InMemoryInvoiceRepository {
    /// Every later call fails with `DomainError::Internal(message)`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn all(&self) -> Vec<Invoice> {
        self.rows.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(DomainError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn insert(&self, invoice: NewInvoice) -> Result<Uuid, DomainError> {
        self.enter()?;
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Invoice {
            id,
            customer_id: invoice.customer_id,
            amount_in_cents: invoice.amount_in_cents,
            status: invoice.status,
            date: invoice.date,
        });
        Ok(id)
    }

    fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<usize, DomainError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(0);
        };
        row.customer_id = changes.customer_id;
        row.amount_in_cents = changes.amount_in_cents;
        row.status = changes.status;
        Ok(1)
    }

    fn delete(&self, id: Uuid) -> Result<usize, DomainError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(before - rows.len())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        self.enter()?;
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.enter()?;
        let mut rows = self.all();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok(ListResult { items, total })
    }
}

/// Holds the first `list` call after it has read its rows until the test
/// releases it, so a mutation can land between the read and the render.
pub struct GatedListRepository {
    inner: Arc<InMemoryInvoiceRepository>,
    gate: Mutex<Option<(oneshot::Sender<()>, mpsc::Receiver<()>)>>,
}

impl GatedListRepository {
    /// Returns the repository, a receiver fired once the first list has
    /// read its rows, and the sender that lets that list finish.
    pub fn new(
        inner: Arc<InMemoryInvoiceRepository>,
    ) -> (Self, oneshot::Receiver<()>, mpsc::Sender<()>) {
        let (read_tx, read_rx) = oneshot::channel();
        let (resume_tx, resume_rx) = mpsc::channel();
        let repo = Self {
            inner,
            gate: Mutex::new(Some((read_tx, resume_rx))),
        };
        (repo, read_rx, resume_tx)
    }
}

impl InvoiceRepository for GatedListRepository {
    fn insert(&self, invoice: NewInvoice) -> Result<Uuid, DomainError> {
        self.inner.insert(invoice)
    }

    fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<usize, DomainError> {
        self.inner.update(id, changes)
    }

    fn delete(&self, id: Uuid) -> Result<usize, DomainError> {
        self.inner.delete(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        self.inner.find_by_id(id)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let result = self.inner.list(page, limit)?;
        let gate = self.gate.lock().unwrap().take();
        if let Some((read_tx, resume_rx)) = gate {
            let _ = read_tx.send(());
            let _ = resume_rx.recv();
        }
        Ok(result)
    }
}

pub fn form(customer_id: &str, amount: &str, status: &str) -> InvoiceForm {
    InvoiceForm {
        customer_id: customer_id.to_string(),
        amount: amount.to_string(),
        status: status.to_string(),
    }
}
