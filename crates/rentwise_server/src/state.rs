//! Shared request state: one SQLite connection behind a mutex.
//!
//! Store calls are synchronous, so handlers hand them to the blocking pool
//! through [`AppState::run`].

use crate::error::AppError;
use rentwise_core::{
    LeadService, PropertyService, RepoResult, RoomService, SqliteLeadRepository,
    SqlitePropertyRepository, SqliteRoomRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a connection returned by `rentwise_core::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `job` against the connection on the blocking thread pool.
    pub async fn run<T, F>(&self, job: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
            job(&*guard).map_err(AppError::from)
        })
        .await
        .map_err(|err| AppError::Internal(format!("database task failed: {err}")))?
    }
}

pub(crate) type Properties<'conn> =
    PropertyService<SqlitePropertyRepository<'conn>, SqliteRoomRepository<'conn>>;
pub(crate) type Rooms<'conn> =
    RoomService<SqliteRoomRepository<'conn>, SqlitePropertyRepository<'conn>>;
pub(crate) type Leads<'conn> = LeadService<
    SqliteLeadRepository<'conn>,
    SqlitePropertyRepository<'conn>,
    SqliteRoomRepository<'conn>,
>;

pub(crate) fn property_service(conn: &Connection) -> RepoResult<Properties<'_>> {
    Ok(PropertyService::new(
        SqlitePropertyRepository::try_new(conn)?,
        SqliteRoomRepository::try_new(conn)?,
    ))
}

pub(crate) fn room_service(conn: &Connection) -> RepoResult<Rooms<'_>> {
    Ok(RoomService::new(
        SqliteRoomRepository::try_new(conn)?,
        SqlitePropertyRepository::try_new(conn)?,
    ))
}

pub(crate) fn lead_service(conn: &Connection) -> RepoResult<Leads<'_>> {
    Ok(LeadService::new(
        SqliteLeadRepository::try_new(conn)?,
        SqlitePropertyRepository::try_new(conn)?,
        SqliteRoomRepository::try_new(conn)?,
    ))
}
