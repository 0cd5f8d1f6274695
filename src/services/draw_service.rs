use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, timeout};

use crate::error::{AppError, AppResult};
use crate::external::{CelebrationProvider, empty_reply_fallback, failure_fallback};
use crate::models::{
    CandidateListResponse, CelebrationCue, ClearHistoryResponse, DrawResponse, DrawState,
    PickerSnapshot, Settings, UpdateSettingsRequest, Winner,
};
use crate::services::draw_machine::{DrawEffect, DrawMachine, TICK_INTERVAL};

/// 状态机及其运行时资源，统一由一把锁保护
struct PickerInner {
    machine: DrawMachine,
    rng: StdRng,
    ticker: Option<JoinHandle<()>>,
    celebration: Option<CelebrationCue>,
}

/// 抽奖服务：驱动 `DrawMachine`，负责动画定时器与 AI 祝贺语请求
#[derive(Clone)]
pub struct DrawService {
    inner: Arc<Mutex<PickerInner>>,
    celebrations: Arc<dyn CelebrationProvider>,
    celebration_timeout: Duration,
}

impl DrawService {
    pub fn new(
        settings: Settings,
        celebrations: Arc<dyn CelebrationProvider>,
        celebration_timeout: Duration,
    ) -> Self {
        Self::with_rng(
            settings,
            celebrations,
            celebration_timeout,
            StdRng::from_entropy(),
        )
    }

    pub fn with_rng(
        settings: Settings,
        celebrations: Arc<dyn CelebrationProvider>,
        celebration_timeout: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PickerInner {
                machine: DrawMachine::new(settings),
                rng,
                ticker: None,
                celebration: None,
            })),
            celebrations,
            celebration_timeout,
        }
    }

    pub async fn snapshot(&self) -> PickerSnapshot {
        let inner = self.inner.lock().await;
        let machine = &inner.machine;
        PickerSnapshot {
            raw_text: machine.raw_text().to_string(),
            candidates: machine.candidates().to_vec(),
            settings: machine.settings(),
            state: machine.state().clone(),
            history: machine.history().entries().to_vec(),
            celebration: inner.celebration.clone(),
        }
    }

    /// 更新候选文本；抽奖动画进行中拒绝修改
    pub async fn set_raw_text(&self, text: &str) -> AppResult<CandidateListResponse> {
        let mut inner = self.inner.lock().await;
        if !inner.machine.set_raw_text(text) {
            return Err(AppError::Busy(
                "Candidate list is locked while a draw is running".into(),
            ));
        }
        let machine = &inner.machine;
        Ok(CandidateListResponse {
            raw_text: machine.raw_text().to_string(),
            candidates: machine.candidates().to_vec(),
            count: machine.candidates().len(),
        })
    }

    pub async fn update_settings(&self, request: &UpdateSettingsRequest) -> Settings {
        let mut inner = self.inner.lock().await;
        let settings = request.apply(inner.machine.settings());
        inner.machine.set_settings(settings);
        log::info!("Picker settings updated: {settings:?}");
        settings
    }

    /// 开始抽奖。列表为空或已有抽奖进行中时忽略请求。
    pub async fn draw(&self) -> DrawResponse {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let effects = inner.machine.start_draw();
        let started = !effects.is_empty();
        if started {
            log::info!(
                "Draw started over {} candidates",
                inner.machine.candidates().len()
            );
        } else {
            log::debug!("Draw request ignored");
        }
        self.run_effects(inner, effects);
        DrawResponse {
            started,
            state: inner.machine.state().clone(),
        }
    }

    /// 强制复位，取消进行中的动画
    pub async fn reset(&self) -> DrawState {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let effects = inner.machine.reset();
        if !effects.is_empty() {
            log::info!("Running draw cancelled");
        }
        self.run_effects(inner, effects);
        inner.machine.state().clone()
    }

    pub async fn history(&self) -> Vec<Winner> {
        self.inner.lock().await.machine.history().entries().to_vec()
    }

    pub async fn find_winner(&self, id: &str) -> AppResult<Winner> {
        self.inner
            .lock()
            .await
            .machine
            .history()
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Winner {id} not found in history")))
    }

    /// 清空历史（需要用户确认）
    pub async fn clear_history(&self, confirmed: bool) -> ClearHistoryResponse {
        let mut inner = self.inner.lock().await;
        let cleared = inner.machine.clear_history(confirmed);
        if cleared {
            log::info!("Winner history cleared");
        }
        ClearHistoryResponse {
            cleared,
            history_len: inner.machine.history().len(),
        }
    }

    /// 推进一帧，返回该轮抽奖是否仍在进行
    async fn tick(&self, draw_seq: u64) -> bool {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let effects = inner.machine.apply_tick(draw_seq, &mut inner.rng);
        self.run_effects(inner, effects);
        inner.machine.is_running(draw_seq)
    }

    async fn complete_celebration(&self, winner: Winner, message: String) {
        let mut inner = self.inner.lock().await;
        log::debug!("Celebration resolved for winner {}", winner.id);
        inner.machine.complete_celebration(winner, message);
    }

    fn run_effects(&self, inner: &mut PickerInner, effects: Vec<DrawEffect>) {
        for effect in effects {
            match effect {
                DrawEffect::StartTicker { draw_seq } => {
                    if let Some(stale) = inner.ticker.replace(self.spawn_ticker(draw_seq)) {
                        stale.abort();
                    }
                }
                DrawEffect::StopTicker { draw_seq } => {
                    if let Some(handle) = inner.ticker.take() {
                        handle.abort();
                    }
                    log::debug!("Ticker for draw {draw_seq} stopped");
                }
                DrawEffect::Celebrate(cue) => {
                    log::info!("Draw finished, winner {}", cue.winner_id);
                    inner.celebration = Some(cue);
                }
                DrawEffect::RequestCelebration(winner) => self.spawn_celebration(winner),
            }
        }
    }

    fn spawn_ticker(&self, draw_seq: u64) -> JoinHandle<()> {
        let svc = self.clone();
        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            loop {
                ticks.tick().await;
                if !svc.tick(draw_seq).await {
                    break;
                }
            }
        })
    }

    /// 后台请求祝贺语，超时按失败处理；不取消，完成后按中奖者 id 回填
    fn spawn_celebration(&self, winner: Winner) {
        let svc = self.clone();
        tokio::spawn(async move {
            let request = svc.celebrations.request_celebration(&winner.name);
            let message = match timeout(svc.celebration_timeout, request).await {
                Ok(message) if message.trim().is_empty() => empty_reply_fallback(&winner.name),
                Ok(message) => message,
                Err(_) => {
                    log::warn!(
                        "Celebration request for {} timed out after {:?}",
                        winner.name,
                        svc.celebration_timeout
                    );
                    failure_fallback(&winner.name)
                }
            };
            svc.complete_celebration(winner, message).await;
        });
    }
}
