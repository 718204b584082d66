//! Sample catalog compiled in with the `demo` feature.

use affiliate_shared::{Post, PostStatus, Product};
use chrono::{DateTime, TimeZone, Utc};

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

fn product(id: &str, name: &str, url: &str, price: f64, category: &str, created: u32) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        affiliate_url: url.to_string(),
        image_url: Some(PLACEHOLDER_IMAGE.to_string()),
        price,
        category: category.to_string(),
        created_at: day(created),
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(
            "1",
            "Monitor Ultrawide 34\" Samsung",
            "https://amazon.com.br/monitor-samsung",
            2499.99,
            "Monitores",
            15,
        ),
        product(
            "2",
            "Cadeira Ergonômica Herman Miller",
            "https://mercadolivre.com.br/cadeira-herman-miller",
            4999.99,
            "Mobiliário",
            14,
        ),
        product(
            "3",
            "Mesa Standing Desk Elétrica",
            "https://amazon.com.br/mesa-standing-desk",
            1899.99,
            "Mobiliário",
            13,
        ),
        product(
            "4",
            "Webcam Logitech C920 Pro",
            "https://amazon.com.br/webcam-logitech",
            399.99,
            "Periféricos",
            12,
        ),
        product(
            "5",
            "Luminária LED Inteligente",
            "https://mercadolivre.com.br/luminaria-led",
            299.99,
            "Iluminação",
            11,
        ),
        product(
            "6",
            "Teclado Mecânico Keychron K2",
            "https://amazon.com.br/teclado-keychron",
            699.99,
            "Periféricos",
            10,
        ),
    ]
}

const MONITOR_REVIEW: &str = r#"# Review Completo: Monitor Ultrawide Samsung

## Primeiras Impressões

O **Monitor Ultrawide 34" Samsung** chegou em uma embalagem impecável.

### Especificações Técnicas

- **Tamanho**: 34 polegadas
- **Resolução**: 3440 x 1440 (UWQHD)
- **Taxa de Atualização**: 100Hz
- **Conectividade**: USB-C, HDMI, DisplayPort

## Prós e Contras

### ✅ Prós
- Qualidade de imagem excepcional
- Perfeito para multitasking

### ❌ Contras
- Preço elevado
- Ocupa bastante espaço na mesa

**Nota: 9/10**"#;

const CHAIR_REVIEW: &str = r#"# Cadeira Ergonômica Herman Miller: O Investimento na Sua Saúde

## Por que Investir em uma Boa Cadeira?

Passamos em média 8 horas por dia sentados. Uma cadeira de qualidade não é luxo, é necessidade.

### Características Principais

- **Apoio Lombar Ajustável**: Suporte perfeito para a coluna
- **Braços 8D**: Ajuste em todas as direções
- **Base de Alumínio**: Durabilidade e estabilidade

## Vale o Investimento?

Sim, definitivamente.

**Nota: 10/10**"#;

fn post(
    id: &str,
    title: &str,
    slug: &str,
    content: &str,
    source: &Product,
    created: u32,
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        content: content.to_string(),
        cover_image: Some(PLACEHOLDER_IMAGE.to_string()),
        price: Some(source.price),
        affiliate_url: Some(source.affiliate_url.clone()),
        category: source.category.clone(),
        status: PostStatus::Published,
        product_id: Some(source.id.clone()),
        created_at: day(created),
        updated_at: day(created),
    }
}

pub fn posts() -> Vec<Post> {
    let products = products();
    vec![
        post(
            "1",
            "Review Completo: Monitor Ultrawide Samsung - Vale a Pena?",
            "review-monitor-ultrawide-samsung",
            MONITOR_REVIEW,
            &products[0],
            15,
        ),
        post(
            "2",
            "Cadeira Ergonômica Herman Miller: O Investimento na Sua Saúde",
            "review-cadeira-herman-miller",
            CHAIR_REVIEW,
            &products[1],
            14,
        ),
    ]
}

pub fn post_by_slug(slug: &str) -> Option<Post> {
    posts().into_iter().find(|post| post.slug == slug)
}
