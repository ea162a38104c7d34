use bevy::app::AppExit;
use bevy::prelude::*;

use crate::core::Session;

/// Logs the end-of-run tally once the app is shutting down, whatever
/// screen it was on.
pub fn report_session_summary(mut events: EventReader<AppExit>, session: Res<Session>) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let (destroyed_pct, missed_pct) = session.percentages();
    info!(
        "you destroyed: {} ({destroyed_pct:.2}%), you missed: {} ({missed_pct:.2}%)",
        session.destroyed(),
        session.missed(),
    );
}
