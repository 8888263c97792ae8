use clap::{Args, Subcommand};

use common::prelude::{MessageList, MessageView, PoolList};
use evade_node::http_server::api::v0::pool::{
    CreatePoolRequest, DeletePoolRequest, ListPoolsRequest, PoolInfoRequest, ReadMessagesRequest,
    UpdatePoolRequest, WriteMessageRequest,
};

use super::{call_pretty, RequestError};
use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Create, CreatePoolRequest),
    (List, ListPoolsRequest),
    (Info, PoolInfoRequest),
    (Read, ReadMessagesRequest),
    (Write, WriteMessageRequest),
    (Update, UpdatePoolRequest),
    (Delete, DeletePoolRequest),
}

// Rename the generated Command to PoolCommand for clarity
pub type PoolCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Pool {
    #[command(subcommand)]
    pub command: PoolCommand,
}

#[async_trait::async_trait]
impl Op for Pool {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

macro_rules! pretty_op {
    ($($request:ty),* $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl Op for $request {
                type Error = RequestError;
                type Output = String;

                async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
                    call_pretty(ctx, self.clone()).await
                }
            }
        )*
    };
}

pretty_op!(
    CreatePoolRequest,
    PoolInfoRequest,
    WriteMessageRequest,
    UpdatePoolRequest,
    DeletePoolRequest,
);

#[async_trait::async_trait]
impl Op for ListPoolsRequest {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let list: PoolList = client.call(self.clone()).await?;
        Ok(render_pools(&list))
    }
}

#[async_trait::async_trait]
impl Op for ReadMessagesRequest {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let list: MessageList = client.call(self.clone()).await?;
        Ok(render_messages(&list))
    }
}

fn render_pools(list: &PoolList) -> String {
    if list.pools.is_empty() {
        return format!("No pools ({} listed on this node)", list.total);
    }

    let mut lines = vec![format!("{} of {} pools:", list.count, list.total)];
    for pool in &list.pools {
        let mut line = format!("  {}  {:<8}", pool.id, pool.pool_type.as_str());
        if let Some(tag) = &pool.tag {
            line.push_str(&format!("  #{}", tag));
        }
        if let Some(description) = &pool.description {
            line.push_str(&format!("  {}", description));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn render_messages(list: &MessageList) -> String {
    if list.messages.is_empty() {
        return format!("No messages ({} in pool)", list.total);
    }

    let mut lines = vec![format!("{} of {} messages:", list.count, list.total)];
    lines.extend(list.messages.iter().map(render_message));
    lines.join("\n")
}

fn render_message(message: &MessageView) -> String {
    let author = message
        .signature
        .as_ref()
        .map(|s| s.value.as_str())
        .unwrap_or("anonymous");
    let body = match (&message.fields.text, &message.fields.ciphertext) {
        (Some(text), _) => text.clone(),
        (None, Some(ciphertext)) => format!("<encrypted, {} bytes>", ciphertext.len()),
        (None, None) => String::new(),
    };
    format!("  [{}] {}: {}", message.index, author, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::prelude::{MessageFields, MessageKind, PoolInfo, PoolType, SignatureInfo};

    fn message(index: u64, fields: MessageFields, signature: Option<&str>) -> MessageView {
        MessageView {
            index,
            message_type: if fields.text.is_some() {
                MessageKind::Plaintext
            } else {
                MessageKind::Encrypted
            },
            fields,
            created_at: None,
            signature: signature.map(|value| SignatureInfo {
                id: "abcde".into(),
                value: value.into(),
                description: None,
                created_at: None,
            }),
        }
    }

    #[test]
    fn test_render_messages() {
        let list = MessageList {
            total: 5,
            count: 2,
            messages: vec![
                message(
                    4,
                    MessageFields {
                        text: Some("hello".into()),
                        ..Default::default()
                    },
                    Some("alice"),
                ),
                message(
                    5,
                    MessageFields {
                        ciphertext: Some(vec![0; 12]),
                        nonce: Some(vec![1]),
                        tag: Some(vec![2]),
                        ..Default::default()
                    },
                    None,
                ),
            ],
        };

        assert_eq!(
            render_messages(&list),
            "2 of 5 messages:\n  [4] alice: hello\n  [5] anonymous: <encrypted, 12 bytes>"
        );
    }

    #[test]
    fn test_render_empty_pool_list() {
        let list = PoolList {
            total: 3,
            count: 0,
            pools: Vec::new(),
        };
        assert_eq!(render_pools(&list), "No pools (3 listed on this node)");
    }

    #[test]
    fn test_render_pools_includes_tag() {
        let list = PoolList {
            total: 1,
            count: 1,
            pools: vec![PoolInfo {
                id: "a1b2".into(),
                tag: Some("lobby".into()),
                pool_type: PoolType::Wall,
                public: true,
                encrypted: false,
                description: None,
                created_at: None,
                creator_signature: None,
                write_key_required: false,
                read_key_required: false,
            }],
        };
        let rendered = render_pools(&list);
        assert!(rendered.starts_with("1 of 1 pools:"));
        assert!(rendered.contains("#lobby"));
    }
}
