use kernel::event::{EventPublisher, ReservationEvent};

/// ライフサイクルイベントを構造化ログとして流す既定の実装。
/// 通知の整形・配送は外部コラボレーターが担うため、ここでは記録のみ行う。
#[derive(Debug, Default, Clone)]
pub struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: ReservationEvent) {
        tracing::info!(?event, "reservation lifecycle event");
    }
}
