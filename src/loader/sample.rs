//! Built-in sample resources used when the content store yields nothing.

use crate::models::Resource;

const NLP: &str = "Natural Language Processing";
const VISION: &str = "Computer Vision";
const FRAMEWORKS: &str = "Frameworks";

/// Nine representative resources across the five collections.
pub fn sample_resources() -> Vec<Resource> {
    vec![
        Resource::new("gpt4", "GPT-4", "https://openai.com/gpt-4", Some(NLP)),
        Resource::new("llama2", "LLaMA 2", "https://ai.meta.com/llama/", Some(NLP)),
        Resource::new(
            "stable-diffusion",
            "Stable Diffusion",
            "https://stability.ai/stable-diffusion",
            Some("Generative AI"),
        ),
        Resource::new("imagenet", "ImageNet", "https://www.image-net.org/", Some(VISION)),
        Resource::new("coco", "COCO", "https://cocodataset.org/", Some(VISION)),
        Resource::new(
            "pytorch-basics",
            "PyTorch Basics",
            "https://pytorch.org/tutorials/beginner/basics/intro.html",
            Some(FRAMEWORKS),
        ),
        Resource::new("tensorflow", "TensorFlow", "https://www.tensorflow.org/", Some(FRAMEWORKS)),
        Resource::new("pytorch", "PyTorch", "https://pytorch.org/", Some(FRAMEWORKS)),
        Resource::new("huggingface", "Hugging Face", "https://huggingface.co/", Some("Platforms")),
    ]
}
