use serde::{Deserialize, Serialize};

/// 对象存储 createobject 事件（只保留处理所需字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageEvent {
    #[serde(rename = "eventType", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(rename = "eventTime", default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    pub data: EventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    #[serde(rename = "additionalDetails")]
    pub additional_details: AdditionalDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalDetails {
    #[serde(rename = "bucketName")]
    pub bucket_name: String,
    pub namespace: String,
}

/// 定位一张待检测图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocation {
    pub namespace: String,
    pub bucket: String,
    pub object_name: String,
}

impl From<ObjectStorageEvent> for ImageLocation {
    fn from(event: ObjectStorageEvent) -> Self {
        Self {
            namespace: event.data.additional_details.namespace,
            bucket: event.data.additional_details.bucket_name,
            object_name: event.data.resource_name,
        }
    }
}

impl std::fmt::Display for ImageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\" from Bucket: \"{}\" in Namespace: \"{}\"",
            self.object_name, self.bucket, self.namespace
        )
    }
}
