use async_trait::async_trait;

/// AI 返回空内容时使用的兜底祝贺语
pub fn empty_reply_fallback(item_name: &str) -> String {
    format!("เย้! คุณได้รับ {item_name} แล้ว!")
}

/// 请求失败（网络 / 超时 / 响应异常）时使用的兜底祝贺语
pub fn failure_fallback(item_name: &str) -> String {
    format!("ว้าว! ยินดีด้วยกับรางวัล {item_name}! 🎉")
}

/// 祝贺语生成服务。实现方必须吞掉所有错误，始终返回可展示的非空字符串。
#[async_trait]
pub trait CelebrationProvider: Send + Sync {
    async fn request_celebration(&self, item_name: &str) -> String;
}

/// 未配置 API key 时使用，直接返回兜底文案
#[derive(Debug, Clone, Default)]
pub struct DisabledCelebrations;

#[async_trait]
impl CelebrationProvider for DisabledCelebrations {
    async fn request_celebration(&self, item_name: &str) -> String {
        failure_fallback(item_name)
    }
}
