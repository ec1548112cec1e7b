use reqwest::multipart;
use serde::Deserialize;

use crate::config::ImageHostConfig;

/// Client for the Cloudinary-style external image host. Uploads go through
/// an unsigned preset; deletion uses the admin API with basic auth.
#[derive(Clone)]
pub struct ImageHost {
    client: reqwest::Client,
    config: ImageHostConfig,
}

#[derive(Debug)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    secure_url: String,
    public_id: String,
}

impl ImageHost {
    pub fn new(config: ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> anyhow::Result<UploadedImage> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        );

        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("image host upload failed with status {}", response.status());
        }
        let body: UploadResponseBody = response.json().await?;

        Ok(UploadedImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    pub async fn delete(&self, public_id: &str) -> anyhow::Result<()> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/resources/image/upload",
            self.config.cloud_name
        );

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&[("public_ids[]", public_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("image host delete failed with status {}", response.status());
        }
        Ok(())
    }
}
