//! Pure picker state machine.
//!
//! `DrawMachine` owns the raw list text, settings, draw state and history. Every
//! transition is a plain method that mutates the machine and returns the side
//! effects the caller has to run (timers, confetti, AI request). Nothing here
//! touches tokio, so the whole draw can be stepped in unit tests with a seeded RNG.

use rand::Rng;
use std::time::Duration;

use crate::models::{CelebrationCue, DrawState, HistoryLog, Settings, Winner};
use crate::utils::{join_candidates, parse_candidates};

/// 每次抽奖的动画帧数
pub const SHUFFLE_TICKS: u32 = 12;
/// 动画帧间隔
pub const TICK_INTERVAL: Duration = Duration::from_millis(40);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawEffect {
    /// 为该轮抽奖启动定时器
    StartTicker { draw_seq: u64 },
    /// 释放该轮抽奖的定时器
    StopTicker { draw_seq: u64 },
    /// 触发彩带特效（不关心结果）
    Celebrate(CelebrationCue),
    /// 异步请求 AI 祝贺语，结果通过 `complete_celebration` 回填
    RequestCelebration(Winner),
}

/// 进行中的一轮抽奖
#[derive(Debug, Clone)]
struct ShuffleRun {
    draw_seq: u64,
    ticks: u32,
    snapshot: Vec<String>,
    settings: Settings,
}

#[derive(Debug, Clone)]
pub struct DrawMachine {
    raw_text: String,
    candidates: Vec<String>,
    settings: Settings,
    state: DrawState,
    history: HistoryLog,
    run: Option<ShuffleRun>,
    next_seq: u64,
}

impl DrawMachine {
    pub fn new(settings: Settings) -> Self {
        Self {
            raw_text: String::new(),
            candidates: Vec::new(),
            settings,
            state: DrawState::Idle,
            history: HistoryLog::new(),
            run: None,
            next_seq: 1,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// 当前抽奖是否仍在该序号上运行
    pub fn is_running(&self, draw_seq: u64) -> bool {
        self.run.as_ref().is_some_and(|r| r.draw_seq == draw_seq)
    }

    /// 替换输入文本并重新解析候选列表。动画进行中文本被锁定，返回 false。
    pub fn set_raw_text(&mut self, text: &str) -> bool {
        if self.run.is_some() {
            return false;
        }
        self.raw_text = text.to_string();
        self.candidates = parse_candidates(text);
        true
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// 开始一轮抽奖。列表为空或已有抽奖进行中时直接忽略（返回空列表）。
    pub fn start_draw(&mut self) -> Vec<DrawEffect> {
        if self.candidates.is_empty() || self.run.is_some() {
            return Vec::new();
        }

        let draw_seq = self.next_seq;
        self.next_seq += 1;

        let snapshot = self.candidates.clone();
        self.state = DrawState::Shuffling {
            displayed: snapshot[0].clone(),
        };
        self.run = Some(ShuffleRun {
            draw_seq,
            ticks: 0,
            snapshot,
            settings: self.settings,
        });

        vec![DrawEffect::StartTicker { draw_seq }]
    }

    /// 推进一帧动画；最后一帧之后重新随机抽取真正的中奖项。
    /// 非当前轮次的帧会被忽略。
    pub fn apply_tick<R: Rng>(&mut self, draw_seq: u64, rng: &mut R) -> Vec<DrawEffect> {
        let Some(run) = self.run.as_mut().filter(|r| r.draw_seq == draw_seq) else {
            return Vec::new();
        };

        let flashed = rng.gen_range(0..run.snapshot.len());
        self.state = DrawState::Shuffling {
            displayed: run.snapshot[flashed].clone(),
        };
        run.ticks += 1;

        if run.ticks < SHUFFLE_TICKS {
            return Vec::new();
        }

        let winner_index = rng.gen_range(0..run.snapshot.len());
        self.finish_draw(winner_index)
    }

    fn finish_draw(&mut self, winner_index: usize) -> Vec<DrawEffect> {
        let Some(run) = self.run.take() else {
            return Vec::new();
        };

        let winner = Winner::new(run.snapshot[winner_index].clone());
        self.state = DrawState::Result {
            winner: winner.clone(),
        };

        let mut effects = vec![
            DrawEffect::StopTicker {
                draw_seq: run.draw_seq,
            },
            DrawEffect::Celebrate(CelebrationCue::for_winner(&winner.id)),
        ];

        if run.settings.remove_after_pick {
            // 按抽中的下标移除，重复名称时只移除被抽中的那一项
            let mut remaining = run.snapshot;
            remaining.remove(winner_index);
            self.raw_text = join_candidates(&remaining);
            self.candidates = remaining;
        }

        if run.settings.auto_ai {
            effects.push(DrawEffect::RequestCelebration(winner));
        } else {
            self.history.record(winner);
        }

        effects
    }

    /// 回填 AI 祝贺语：按 id 更新当前展示结果（若仍是同一位中奖者）并写入历史。
    pub fn complete_celebration(&mut self, mut winner: Winner, message: String) {
        let message = message.trim();
        winner.cheer_message = (!message.is_empty()).then(|| message.to_string());

        if let DrawState::Result { winner: shown } = &mut self.state
            && shown.id == winner.id
        {
            shown.cheer_message = winner.cheer_message.clone();
        }

        self.history.record(winner);
    }

    /// 强制复位：取消进行中的动画（不产生中奖者），或清除已展示的结果。
    pub fn reset(&mut self) -> Vec<DrawEffect> {
        self.state = DrawState::Idle;
        match self.run.take() {
            Some(run) => vec![DrawEffect::StopTicker {
                draw_seq: run.draw_seq,
            }],
            None => Vec::new(),
        }
    }

    /// 清空历史。未确认时不做任何修改；确认后也会清除已展示的结果，但不打断动画。
    pub fn clear_history(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.history.clear();
        if matches!(self.state, DrawState::Result { .. }) {
            self.state = DrawState::Idle;
        }
        true
    }
}
